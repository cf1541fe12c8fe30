//! Dispatch result types.

use serde::{Deserialize, Serialize};

/// The stage of the escalation ladder that produced a result.
///
/// Stages are ordered by degradation: each later stage is only reached
/// when every earlier one failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStage {
    /// Served from the response cache; no backend was invoked.
    CacheCheck,
    /// Best-scored candidate answered on the restricted first pass.
    Primary,
    /// A later candidate answered during the full sequential walk.
    SequentialFallback,
    /// A candidate won the parallel race.
    ParallelRace,
    /// The offline keyword-matched canned answer.
    StaticFallback,
}

impl DispatchStage {
    /// Stage label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchStage::CacheCheck => "cache",
            DispatchStage::Primary => "primary",
            DispatchStage::SequentialFallback => "sequential_fallback",
            DispatchStage::ParallelRace => "parallel_race",
            DispatchStage::StaticFallback => "static_fallback",
        }
    }
}

impl std::fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of one dispatch call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchResponse {
    /// The result text. Always present: the static fallback guarantees
    /// the dispatcher never returns empty-handed.
    pub text: String,
    /// The backend that produced the text, where one did. `None` for
    /// the static fallback and for cache entries without a recorded
    /// producer.
    pub backend: Option<String>,
    /// The stage that produced the result.
    pub stage: DispatchStage,
}
