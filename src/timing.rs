use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Open,
    Write,
    Calc,
    Read,
    Total,
}

/// Millisecond durations per phase. Skipped phases stay `None` and are
/// omitted from serialized metadata rather than zero-filled.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calc_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_ms: Option<u64>,
}

/// Accumulates phase durations for a single computation attempt. Each
/// attempt owns its own recorder; nothing here is shared across requests.
#[derive(Debug, Default)]
pub struct TimingRecorder {
    started: [Option<Instant>; 5],
    timings: PhaseTimings,
}

impl TimingRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, phase: Phase) {
        self.started[phase as usize] = Some(Instant::now());
    }

    /// Accumulates elapsed time since the matching `start`. A stop without
    /// a start is ignored so skipped phases never appear in the snapshot.
    pub fn stop(&mut self, phase: Phase) {
        let Some(started) = self.started[phase as usize].take() else {
            return;
        };
        let elapsed = started.elapsed().as_millis() as u64;
        let slot = self.slot_mut(phase);
        *slot = Some(slot.unwrap_or(0) + elapsed);
    }

    pub fn snapshot(&self) -> PhaseTimings {
        self.timings.clone()
    }

    fn slot_mut(&mut self, phase: Phase) -> &mut Option<u64> {
        match phase {
            Phase::Open => &mut self.timings.open_ms,
            Phase::Write => &mut self.timings.write_ms,
            Phase::Calc => &mut self.timings.calc_ms,
            Phase::Read => &mut self.timings.read_ms,
            Phase::Total => &mut self.timings.total_ms,
        }
    }
}
