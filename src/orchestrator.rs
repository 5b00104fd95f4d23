use crate::cache::ResultCache;
use crate::config::Settings;
use crate::engine::CalcEngine;
use crate::errors::PricingError;
use crate::fast_read;
use crate::fingerprint::Fingerprint;
use crate::layout::input_edit_plan;
use crate::location::{LocationKind, WorkbookLocation, classify};
use crate::model::{ComputationMeta, ComputeSource, PricingInputs, PricingResult};
use crate::rules::compute_from_cost_grid;
use crate::session::{EngineLease, run_session, run_warm_session};
use crate::timing::{Phase, PhaseTimings, TimingRecorder};
use std::sync::Arc;

/// Public entry point for pricing. Decides the strategy for each request
/// (cache hit, fast read, or live automation), runs it under timing, and
/// maintains the result cache. Safe to share across request workers.
pub struct Orchestrator {
    engine: Arc<dyn CalcEngine>,
    lease: EngineLease,
    cache: ResultCache,
}

impl Orchestrator {
    pub fn new(engine: Arc<dyn CalcEngine>) -> Self {
        Self {
            engine,
            lease: EngineLease::new(),
            cache: ResultCache::new(),
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn lease(&self) -> &EngineLease {
        &self.lease
    }

    /// Compute a priced breakdown, serving from cache when the fingerprint
    /// matches. Fails `NotEnabled` when compatibility mode is off,
    /// regardless of cache state.
    pub async fn compute(
        &self,
        inputs: &PricingInputs,
        settings: &Settings,
    ) -> Result<PricingResult, PricingError> {
        self.compute_inner(inputs, settings, false).await
    }

    /// Force a fresh computation against `path`: the whole cache is
    /// invalidated before the attempt, so refresh semantics win over any
    /// concurrent hit.
    pub async fn refresh(
        &self,
        path: &str,
        inputs: &PricingInputs,
        settings: &Settings,
    ) -> Result<PricingResult, PricingError> {
        let effective = Settings {
            workbook_path: path.to_string(),
            ..settings.clone()
        };
        self.compute_inner(inputs, &effective, true).await
    }

    /// Read-only engine warm pass (open, recalculate, close). Does not
    /// touch the cache.
    pub async fn warm(&self, settings: &Settings) -> Result<PhaseTimings, PricingError> {
        if !settings.compat_mode_enabled {
            return Err(PricingError::NotEnabled);
        }
        let location = resolve_location(settings)?;
        let _permit = self.lease.acquire(settings.lease_wait_ms).await?;

        let mut timing = TimingRecorder::new();
        timing.start(Phase::Total);
        run_warm_session(
            self.engine.as_ref(),
            &location.path,
            settings.recalc_timeout_ms,
            &mut timing,
        )
        .await?;
        timing.stop(Phase::Total);
        tracing::debug!(workbook = %location.raw, "engine warm pass done");
        Ok(timing.snapshot())
    }

    async fn compute_inner(
        &self,
        inputs: &PricingInputs,
        settings: &Settings,
        force_refresh: bool,
    ) -> Result<PricingResult, PricingError> {
        if !settings.compat_mode_enabled {
            return Err(PricingError::NotEnabled);
        }

        let location = resolve_location(settings)?;
        let signature = location
            .signature
            .clone()
            .ok_or_else(|| PricingError::WorkbookNotFound(location.raw.clone()))?;

        // Strategy is decided up front from classification and engine
        // availability, never as a fallback after a failed attempt.
        let strategy = if location.kind == LocationKind::Remote || !self.engine.is_available() {
            ComputeSource::FastRead
        } else {
            ComputeSource::LiveAutomation
        };
        let fingerprint = Fingerprint::compute(&signature, inputs, strategy.tag());

        if force_refresh {
            self.cache.invalidate_all();
        } else if let Some(entry) = self.cache.get(&fingerprint) {
            let mut result = entry.result;
            result.meta.source = ComputeSource::Cached;
            result.meta.cache_ts = Some(entry.inserted_at);
            return Ok(result);
        }

        let mut timing = TimingRecorder::new();
        timing.start(Phase::Total);
        let attempt = match strategy {
            ComputeSource::FastRead => fast_read::read_grid(&location.path, &mut timing)
                .await
                .map(|grid| (grid, false)),
            ComputeSource::LiveAutomation => match self.lease.acquire(settings.lease_wait_ms).await
            {
                Ok(permit) => {
                    let writes = input_edit_plan(inputs);
                    let outcome = run_session(
                        self.engine.as_ref(),
                        &location.path,
                        &writes,
                        settings.recalc_timeout_ms,
                        &mut timing,
                    )
                    .await;
                    drop(permit);
                    outcome.map(|o| (o.grid, o.opened_readonly))
                }
                Err(busy) => Err(busy),
            },
            ComputeSource::Cached => unreachable!("cached is never an execution strategy"),
        };
        timing.stop(Phase::Total);

        let (grid, opened_readonly) = match attempt {
            Ok(attempt) => attempt,
            Err(err) => {
                // Phase timings of the failed attempt go to the log, not
                // into the opaque error.
                tracing::warn!(
                    workbook = %location.raw,
                    source = strategy.tag(),
                    error = %err,
                    timings = ?timing.snapshot(),
                    "pricing attempt failed"
                );
                return Err(err);
            }
        };

        let breakdown = compute_from_cost_grid(inputs, &grid);
        let result = PricingResult {
            margin: inputs.margin,
            base_cost: breakdown.base_cost,
            base_sell: breakdown.base_sell,
            options_total: breakdown.options_total,
            total: breakdown.total,
            lines: breakdown.lines,
            grid,
            meta: ComputationMeta {
                source: strategy,
                opened_readonly,
                timings: timing.snapshot(),
                cache_ts: None,
            },
        };

        // A refresh leaves the cache empty; the next compute repopulates
        // it with a fresh attempt of its own.
        if !force_refresh {
            self.cache.put(fingerprint, result.clone());
        }
        tracing::info!(
            workbook = %location.raw,
            source = strategy.tag(),
            total = result.total,
            "pricing computed"
        );
        Ok(result)
    }
}

fn resolve_location(settings: &Settings) -> Result<WorkbookLocation, PricingError> {
    let raw = settings.workbook_path.trim();
    if raw.is_empty() {
        return Err(PricingError::PathMissing);
    }
    let location = classify(raw);
    if location.kind == LocationKind::Invalid {
        return Err(PricingError::PathInvalid(location.raw));
    }
    Ok(location)
}
