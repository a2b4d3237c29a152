//! Content-addressed verdict cache.
//!
//! Identical (query, response) pairs recur across batch and replay
//! workloads; a verdict for a repeat pair is a pure function of the same
//! textual inputs, so replaying it skips a judge call entirely. The TTL
//! bounds staleness if judging policy changes; the capacity bound keeps
//! memory O(capacity) regardless of request volume.
//!
//! Eviction is strict oldest-insertion-first and expiry is checked
//! synchronously on every read — entries are never refreshed by lookups.
//! That rules out an off-the-shelf LRU (access order and eventual
//! eviction are the wrong semantics here), so the store is a plain
//! `HashMap` behind a single mutex. Every read-modify-write sequence is
//! atomic under that lock, and the lock is never held across an await.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::telemetry;
use crate::types::{JUDGE_CACHE_HIT, Verdict};

/// Configuration for the verdict cache.
///
/// ```rust
/// # use forseti::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(50_000)
///     .ttl(Duration::from_secs(6 * 3600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached verdicts. Default: 10,000.
    pub max_entries: usize,
    /// Time-to-live for cached verdicts. Default: 24 hours.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(24 * 3600),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached verdicts.
    pub fn max_entries(mut self, n: usize) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached verdicts.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Read-only cache occupancy snapshot for operational tooling.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub usage_percent: f64,
}

struct CacheEntry {
    relevance: f64,
    faithfulness: f64,
    reasoning: String,
    inserted_at: Instant,
}

/// In-memory verdict store keyed by a content hash of the audited pair.
pub struct EvaluationCache {
    entries: Mutex<HashMap<[u8; 32], CacheEntry>>,
    config: CacheConfig,
}

impl EvaluationCache {
    /// Create a cache with the default capacity and TTL.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a cache with a custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Look up a previously stored verdict for this (query, response) pair.
    ///
    /// An entry older than the TTL is deleted here and reported as a miss;
    /// a hit does not refresh the entry's age. The returned verdict carries
    /// the [`JUDGE_CACHE_HIT`] sentinel.
    pub fn lookup(&self, query: &str, response: &str) -> Option<Verdict> {
        let key = cache_key(query, response);
        let mut entries = self.entries.lock().expect("cache mutex poisoned");

        match entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.config.ttl => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(Verdict {
                    relevance: entry.relevance,
                    faithfulness: entry.faithfulness,
                    reasoning: entry.reasoning.clone(),
                    judge: JUDGE_CACHE_HIT.to_string(),
                })
            }
            Some(_) => {
                entries.remove(&key);
                metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL, "reason" => "expired")
                    .increment(1);
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Store a verdict's scores and reasoning for this (query, response) pair.
    ///
    /// When inserting a new key at capacity, the single oldest-inserted
    /// entry is evicted first; overwriting an existing key never evicts.
    pub fn store(&self, query: &str, response: &str, verdict: &Verdict) {
        let key = cache_key(query, response);
        let mut entries = self.entries.lock().expect("cache mutex poisoned");

        if !entries.contains_key(&key) && entries.len() >= self.config.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(k, _)| *k);
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
                metrics::counter!(telemetry::CACHE_EVICTIONS_TOTAL, "reason" => "capacity")
                    .increment(1);
            }
        }

        entries.insert(
            key,
            CacheEntry {
                relevance: verdict.relevance,
                faithfulness: verdict.faithfulness,
                reasoning: verdict.reasoning.clone(),
                inserted_at: Instant::now(),
            },
        );
    }

    /// Current occupancy. Introspection only, no mutation.
    pub fn stats(&self) -> CacheStats {
        let size = self.entries.lock().expect("cache mutex poisoned").len();
        CacheStats {
            size,
            capacity: self.config.max_entries,
            usage_percent: size as f64 / self.config.max_entries as f64 * 100.0,
        }
    }
}

impl Default for EvaluationCache {
    fn default() -> Self {
        Self::new()
    }
}

/// 32-byte BLAKE3 digest of the trimmed (query, response) pair.
///
/// Each field's byte length is hashed before its bytes, so the field
/// boundary is unambiguous: ("ab", "c") and ("a", "bc") produce different
/// keys even though their concatenation is identical.
fn cache_key(query: &str, response: &str) -> [u8; 32] {
    let query = query.trim();
    let response = response.trim();

    let mut hasher = blake3::Hasher::new();
    hasher.update(&(query.len() as u64).to_le_bytes());
    hasher.update(query.as_bytes());
    hasher.update(&(response.len() as u64).to_le_bytes());
    hasher.update(response.as_bytes());
    *hasher.finalize().as_bytes()
}
