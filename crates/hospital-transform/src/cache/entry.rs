use std::cmp::Ordering;

use super::CacheTier;

/// Time-invariant eviction ordering, stored in log space.
///
/// With `recency = exp(-λ·age)` the score `ln(1+f)·w·recency` of every entry
/// shares the factor `exp(-λ·now)`, so ordering by
/// `ln(ln(1+f)) + ln(w) + λ·last_access` never changes as the clock advances.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EvictionPriority(f64);

impl PartialEq for EvictionPriority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EvictionPriority {}

impl PartialOrd for EvictionPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EvictionPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Per-tier index key: lowest priority first, then oldest insertion.
pub(crate) type IndexKey = (EvictionPriority, u64);

#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<V> {
    pub(crate) value: V,
    pub(crate) tier: CacheTier,
    pub(crate) access_frequency: u64,
    pub(crate) context_weight: f64,
    pub(crate) last_access_secs: f64,
    pub(crate) insertion_seq: u64,
}

impl<V> CacheEntry<V> {
    pub(crate) fn priority(&self, decay_rate: f64) -> EvictionPriority {
        if self.access_frequency == 0 {
            return EvictionPriority(f64::NEG_INFINITY);
        }

        let frequency = (1.0 + self.access_frequency as f64).ln();
        EvictionPriority(frequency.ln() + self.context_weight.ln() + decay_rate * self.last_access_secs)
    }

    pub(crate) fn index_key(&self, decay_rate: f64) -> IndexKey {
        (self.priority(decay_rate), self.insertion_seq)
    }

    /// `ln(1+frequency) × contextWeight × recency` as of `now_secs`.
    pub(crate) fn eviction_score(&self, now_secs: f64, decay_rate: f64) -> f64 {
        let age = (now_secs - self.last_access_secs).max(0.0);
        let recency = (-decay_rate * age).exp();
        (1.0 + self.access_frequency as f64).ln() * self.context_weight * recency
    }
}
