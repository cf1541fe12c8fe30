//! Per-backend performance tracking with exponential moving averages.
//!
//! The [`PerformanceTracker`] is the mutable scoreboard behind adaptive
//! backend selection. Every completed attempt reports its latency and
//! outcome here; the selector reads the resulting scores to order the
//! next candidate list.
//!
//! Two EMAs per backend, with different smoothing: `avg_latency` uses
//! α = 0.2 so latency reacts quickly, while `success_rate` uses α = 0.1
//! so one failure on a normally reliable backend does not overreact.
//!
//! Untried backends sit at neutral defaults (15.0 s, 0.9) so they are
//! neither favoured nor excluded before the first observation.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// EMA smoothing factor for latency observations.
const LATENCY_ALPHA: f64 = 0.2;

/// EMA smoothing factor for success/failure observations.
const SUCCESS_ALPHA: f64 = 0.1;

/// Neutral latency assumed for a backend that has never been attempted.
const NEUTRAL_LATENCY_SECS: f64 = 15.0;

/// Neutral success rate assumed for a backend that has never been attempted.
const NEUTRAL_SUCCESS_RATE: f64 = 0.9;

/// Observed performance of one backend.
///
/// Both fields are exponential moving averages, updated in place after
/// every attempt and never replaced wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// EMA of attempt latency in seconds.
    pub avg_latency: f64,
    /// EMA of attempt outcomes in [0, 1].
    pub success_rate: f64,
}

impl Default for PerformanceRecord {
    fn default() -> Self {
        Self {
            avg_latency: NEUTRAL_LATENCY_SECS,
            success_rate: NEUTRAL_SUCCESS_RATE,
        }
    }
}

impl PerformanceRecord {
    /// Fold one observation into the record.
    fn observe(&mut self, elapsed_secs: f64, success: bool) {
        self.avg_latency = self.avg_latency * (1.0 - LATENCY_ALPHA) + elapsed_secs * LATENCY_ALPHA;
        let outcome = if success { 1.0 } else { 0.0 };
        self.success_rate =
            (self.success_rate * (1.0 - SUCCESS_ALPHA) + outcome * SUCCESS_ALPHA).clamp(0.0, 1.0);
    }

    /// Selection score: lower is better.
    ///
    /// `avg_latency * (0.5 + 0.5 * complexity) / success_rate²`. The
    /// quadratic penalty makes unreliable backends fall out of favour
    /// quickly even when fast. Complexity is clamped to [0, 1].
    pub fn score(&self, input_complexity: f64) -> f64 {
        let complexity = input_complexity.clamp(0.0, 1.0);
        let reliability = self.success_rate.max(f64::EPSILON);
        self.avg_latency * (0.5 + 0.5 * complexity) / (reliability * reliability)
    }
}

/// Shared mutable scoreboard of per-backend performance records.
///
/// Records are created lazily on first update and live for the process
/// lifetime. Updates are serialized per backend: the record map takes a
/// read lock while the individual record takes its own mutex, so
/// concurrent attempts against different backends never contend.
#[derive(Debug, Default)]
pub struct PerformanceTracker {
    records: RwLock<HashMap<String, Mutex<PerformanceRecord>>>,
}

impl PerformanceTracker {
    /// Create an empty tracker; all backends start at neutral defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection score for a backend: lower is better.
    ///
    /// Backends without observations score with neutral defaults.
    pub fn score(&self, backend: &str, input_complexity: f64) -> f64 {
        self.record(backend).score(input_complexity)
    }

    /// Fold one attempt outcome into the backend's record.
    ///
    /// Creates the record at neutral defaults on first update, so the
    /// first observation blends into the neutral prior instead of
    /// replacing it.
    pub fn update(&self, backend: &str, elapsed: Duration, success: bool) {
        let elapsed_secs = elapsed.as_secs_f64();
        {
            let records = self.records.read().expect("tracker lock poisoned");
            if let Some(record) = records.get(backend) {
                record
                    .lock()
                    .expect("record lock poisoned")
                    .observe(elapsed_secs, success);
                return;
            }
        }
        let mut records = self.records.write().expect("tracker lock poisoned");
        // A concurrent updater may have created the record between locks.
        let record = records
            .entry(backend.to_string())
            .or_insert_with(|| Mutex::new(PerformanceRecord::default()));
        record
            .lock()
            .expect("record lock poisoned")
            .observe(elapsed_secs, success);
    }

    /// Current record for a backend (a copy), neutral if never attempted.
    pub fn record(&self, backend: &str) -> PerformanceRecord {
        let records = self.records.read().expect("tracker lock poisoned");
        records
            .get(backend)
            .map(|r| *r.lock().expect("record lock poisoned"))
            .unwrap_or_default()
    }

    /// Read-only snapshot of every observed backend, for diagnostics.
    ///
    /// Ordered by backend name for stable output. Backends never
    /// attempted are absent.
    pub fn snapshot(&self) -> BTreeMap<String, PerformanceRecord> {
        let records = self.records.read().expect("tracker lock poisoned");
        records
            .iter()
            .map(|(name, record)| {
                (
                    name.clone(),
                    *record.lock().expect("record lock poisoned"),
                )
            })
            .collect()
    }
}
