//! Three-tier (hot/warm/cold) cache for hospital assessments.
//!
//! Entries live in a single arena keyed by cache key; each tier keeps an
//! ordered index of its members so the eviction candidate is always the
//! first index entry. All bookkeeping sits behind one mutex, which keeps
//! `get`/`set` linearizable when several pipeline runs share the cache.

mod entry;


use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{error, trace};

use crate::config::CacheConfig;
use entry::{CacheEntry, IndexKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CacheTier {
    L1,
    L2,
    L3,
}

impl CacheTier {
    pub const fn ordered() -> [Self; 3] {
        [Self::L1, Self::L2, Self::L3]
    }

    const fn slot(self) -> usize {
        match self {
            Self::L1 => 0,
            Self::L2 => 1,
            Self::L3 => 2,
        }
    }

    pub const fn warmer(self) -> Option<Self> {
        match self {
            Self::L1 => None,
            Self::L2 => Some(Self::L1),
            Self::L3 => Some(Self::L2),
        }
    }

    pub const fn colder(self) -> Option<Self> {
        match self {
            Self::L1 => Some(Self::L2),
            Self::L2 => Some(Self::L3),
            Self::L3 => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::L1 => "hot",
            Self::L2 => "warm",
            Self::L3 => "cold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheCapacities {
    pub l1: usize,
    pub l2: usize,
    pub l3: usize,
}

impl CacheCapacities {
    pub const fn new(l1: usize, l2: usize, l3: usize) -> Self {
        Self { l1, l2, l3 }
    }

    pub const fn for_tier(&self, tier: CacheTier) -> usize {
        match tier {
            CacheTier::L1 => self.l1,
            CacheTier::L2 => self.l2,
            CacheTier::L3 => self.l3,
        }
    }
}

impl Default for CacheCapacities {
    fn default() -> Self {
        Self::new(100, 500, 2000)
    }
}

/// Healthcare context used to weight an entry's eviction score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheContext {
    pub clinical_data: bool,
    pub bed_count: u32,
    pub complexity_score: f64,
}

impl CacheContext {
    pub const LARGE_HOSPITAL_BEDS: u32 = 500;
    pub const HIGH_COMPLEXITY: f64 = 7.0;

    pub fn weight(&self) -> f64 {
        let mut weight = 1.0;
        if self.clinical_data {
            weight *= 1.5;
        }
        if self.bed_count >= Self::LARGE_HOSPITAL_BEDS {
            weight *= 1.3;
        }
        if self.complexity_score >= Self::HIGH_COMPLEXITY {
            weight *= 1.2;
        }
        weight
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_hits: u64,
    pub l2_hits: u64,
    pub l3_hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub promotions: u64,
    pub demotions: u64,
    pub dropped: u64,
}

impl CacheStats {
    pub fn hits(&self) -> u64 {
        self.l1_hits + self.l2_hits + self.l3_hits
    }

    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits() + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits() as f64 / lookups as f64
        }
    }
}

/// Internal bookkeeping violation. Never surfaced through `get`/`set`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CacheConsistencyError {
    #[error("entry '{key}' missing from the {tier:?} index")]
    IndexMissing { key: String, tier: CacheTier },
    #[error("{tier:?} index references unknown entry '{key}'")]
    OrphanIndex { key: String, tier: CacheTier },
    #[error("entry '{key}' indexed under {indexed:?} but tagged {tagged:?}")]
    TierMismatch {
        key: String,
        indexed: CacheTier,
        tagged: CacheTier,
    },
    #[error("entry '{key}' indexed with a stale eviction priority")]
    StalePriority { key: String },
    #[error("{tier:?} holds {len} entries, capacity {capacity}")]
    CapacityExceeded {
        tier: CacheTier,
        len: usize,
        capacity: usize,
    },
    #[error("arena holds {arena} entries but tier indexes hold {indexed}")]
    CountMismatch { arena: usize, indexed: usize },
}

struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    tiers: [BTreeMap<IndexKey, String>; 3],
    next_seq: u64,
    stats: CacheStats,
}

pub struct AssessmentCache<V> {
    state: Mutex<CacheState<V>>,
    capacities: CacheCapacities,
    decay_rate: f64,
    epoch: Instant,
}

impl<V> std::fmt::Debug for AssessmentCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentCache")
            .field("capacities", &self.capacities)
            .field("decay_rate", &self.decay_rate)
            .finish_non_exhaustive()
    }
}

impl<V: Clone> AssessmentCache<V> {
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_capacities(config.capacities, config.recency_half_life_secs)
    }

    /// Zero capacities are raised to one; a non-positive half-life falls back to 300 s.
    pub fn with_capacities(capacities: CacheCapacities, half_life_secs: f64) -> Self {
        let capacities = CacheCapacities::new(
            capacities.l1.max(1),
            capacities.l2.max(1),
            capacities.l3.max(1),
        );
        let half_life = if half_life_secs.is_finite() && half_life_secs > 0.0 {
            half_life_secs
        } else {
            300.0
        };

        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                tiers: [BTreeMap::new(), BTreeMap::new(), BTreeMap::new()],
                next_seq: 0,
                stats: CacheStats::default(),
            }),
            capacities,
            decay_rate: std::f64::consts::LN_2 / half_life,
            epoch: Instant::now(),
        }
    }

    pub fn capacities(&self) -> CacheCapacities {
        self.capacities
    }

    /// Look a key up hot-to-cold; hits below L1 move one tier warmer.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut state = self.state.lock();
        match self.lookup(&mut state, key) {
            Ok(value) => value,
            Err(err) => {
                report_violation(&err);
                None
            }
        }
    }

    /// Insert or overwrite `key` in L1, demoting the weakest L1 entry when full.
    pub fn set(&self, key: &str, value: V, context: CacheContext) {
        let mut state = self.state.lock();
        if let Err(err) = self.store(&mut state, key, value, context) {
            report_violation(&err);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().entries.contains_key(key)
    }

    pub fn tier_of(&self, key: &str) -> Option<CacheTier> {
        self.state.lock().entries.get(key).map(|entry| entry.tier)
    }

    pub fn access_frequency(&self, key: &str) -> Option<u64> {
        self.state
            .lock()
            .entries
            .get(key)
            .map(|entry| entry.access_frequency)
    }

    /// Current `ln(1+f) × weight × recency` score for a key.
    pub fn eviction_score(&self, key: &str) -> Option<f64> {
        let now = self.now();
        self.state
            .lock()
            .entries
            .get(key)
            .map(|entry| entry.eviction_score(now, self.decay_rate))
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn tier_len(&self, tier: CacheTier) -> usize {
        self.state.lock().tiers[tier.slot()].len()
    }

    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// Verify that the arena and the tier indexes agree.
    pub fn check_consistency(&self) -> Result<(), CacheConsistencyError> {
        let state = self.state.lock();
        let mut indexed = 0;

        for tier in CacheTier::ordered() {
            let index = &state.tiers[tier.slot()];
            let capacity = self.capacities.for_tier(tier);
            if index.len() > capacity {
                return Err(CacheConsistencyError::CapacityExceeded {
                    tier,
                    len: index.len(),
                    capacity,
                });
            }

            for (index_key, key) in index {
                let entry =
                    state
                        .entries
                        .get(key)
                        .ok_or_else(|| CacheConsistencyError::OrphanIndex {
                            key: key.clone(),
                            tier,
                        })?;
                if entry.tier != tier {
                    return Err(CacheConsistencyError::TierMismatch {
                        key: key.clone(),
                        indexed: tier,
                        tagged: entry.tier,
                    });
                }
                if entry.index_key(self.decay_rate) != *index_key {
                    return Err(CacheConsistencyError::StalePriority { key: key.clone() });
                }
            }
            indexed += index.len();
        }

        if indexed != state.entries.len() {
            return Err(CacheConsistencyError::CountMismatch {
                arena: state.entries.len(),
                indexed,
            });
        }

        Ok(())
    }

    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn lookup(
        &self,
        state: &mut CacheState<V>,
        key: &str,
    ) -> Result<Option<V>, CacheConsistencyError> {
        let Some(tier) = state.entries.get(key).map(|entry| entry.tier) else {
            state.stats.misses += 1;
            return Ok(None);
        };

        match tier {
            CacheTier::L1 => state.stats.l1_hits += 1,
            CacheTier::L2 => state.stats.l2_hits += 1,
            CacheTier::L3 => state.stats.l3_hits += 1,
        }

        let now = self.now();
        self.detach(state, key)?;
        let target = tier.warmer().unwrap_or(tier);
        if let Some(entry) = state.entries.get_mut(key) {
            entry.access_frequency += 1;
            entry.last_access_secs = now;
        }
        if target != tier {
            state.stats.promotions += 1;
            trace!(key, from = ?tier, to = ?target, "promoting cache entry");
        }
        self.make_room(state, target)?;
        self.attach(state, key, target)?;

        Ok(state.entries.get(key).map(|entry| entry.value.clone()))
    }

    fn store(
        &self,
        state: &mut CacheState<V>,
        key: &str,
        value: V,
        context: CacheContext,
    ) -> Result<(), CacheConsistencyError> {
        let now = self.now();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.stats.sets += 1;

        if state.entries.contains_key(key) {
            self.detach(state, key)?;
            if let Some(entry) = state.entries.get_mut(key) {
                entry.value = value;
                entry.context_weight = context.weight();
                entry.last_access_secs = now;
                entry.insertion_seq = seq;
            }
        } else {
            state.entries.insert(
                key.to_string(),
                CacheEntry {
                    value,
                    tier: CacheTier::L1,
                    access_frequency: 0,
                    context_weight: context.weight(),
                    last_access_secs: now,
                    insertion_seq: seq,
                },
            );
        }

        self.make_room(state, CacheTier::L1)?;
        self.attach(state, key, CacheTier::L1)
    }

    /// Demote the lowest-scored members of `tier` until one slot is free.
    fn make_room(
        &self,
        state: &mut CacheState<V>,
        tier: CacheTier,
    ) -> Result<(), CacheConsistencyError> {
        let capacity = self.capacities.for_tier(tier);

        while state.tiers[tier.slot()].len() >= capacity {
            let Some((_, victim)) = state.tiers[tier.slot()].pop_first() else {
                break;
            };

            match tier.colder() {
                Some(colder) => {
                    self.make_room(state, colder)?;
                    self.attach(state, &victim, colder)?;
                    state.stats.demotions += 1;
                    trace!(key = %victim, from = ?tier, to = ?colder, "demoting cache entry");
                }
                None => {
                    state.entries.remove(&victim);
                    state.stats.dropped += 1;
                    trace!(key = %victim, "dropping cold cache entry");
                }
            }
        }

        Ok(())
    }

    fn detach(&self, state: &mut CacheState<V>, key: &str) -> Result<(), CacheConsistencyError> {
        let (tier, index_key) = state
            .entries
            .get(key)
            .map(|entry| (entry.tier, entry.index_key(self.decay_rate)))
            .ok_or_else(|| CacheConsistencyError::OrphanIndex {
                key: key.to_string(),
                tier: CacheTier::L1,
            })?;

        match state.tiers[tier.slot()].remove(&index_key) {
            Some(_) => Ok(()),
            None => Err(CacheConsistencyError::IndexMissing {
                key: key.to_string(),
                tier,
            }),
        }
    }

    fn attach(
        &self,
        state: &mut CacheState<V>,
        key: &str,
        tier: CacheTier,
    ) -> Result<(), CacheConsistencyError> {
        let entry = state
            .entries
            .get_mut(key)
            .ok_or_else(|| CacheConsistencyError::OrphanIndex {
                key: key.to_string(),
                tier,
            })?;
        entry.tier = tier;
        let index_key = entry.index_key(self.decay_rate);
        state.tiers[tier.slot()].insert(index_key, key.to_string());
        Ok(())
    }
}

fn report_violation(err: &CacheConsistencyError) {
    error!(%err, "assessment cache bookkeeping violated");
    debug_assert!(false, "assessment cache bookkeeping violated: {err}");
}
