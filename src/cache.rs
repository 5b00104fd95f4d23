use crate::fingerprint::Fingerprint;
use crate::model::PricingResult;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: PricingResult,
    /// Epoch seconds at insertion, surfaced as `cache_ts` so staleness is
    /// visible to callers. Staleness policy is a caller-side decision.
    pub inserted_at: i64,
}

/// In-memory result store keyed by computation fingerprint. Entries are
/// overwritten on recomputation; `invalidate_all` is the only purge (no
/// TTL, no per-key eviction). Rebuilt empty on process start.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: RwLock<HashMap<Fingerprint, CacheEntry>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        self.entries.read().get(fingerprint).cloned()
    }

    pub fn put(&self, fingerprint: Fingerprint, result: PricingResult) {
        let entry = CacheEntry {
            result,
            inserted_at: chrono::Utc::now().timestamp(),
        };
        self.entries.write().insert(fingerprint, entry);
    }

    pub fn invalidate_all(&self) {
        let mut entries = self.entries.write();
        let evicted = entries.len();
        entries.clear();
        if evicted > 0 {
            tracing::debug!(evicted, "price cache invalidated");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
