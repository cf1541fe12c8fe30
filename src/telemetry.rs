//! Telemetry metric name constants.
//!
//! Centralised metric names for sleipnir operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `sleipnir_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `backend` — backend name (e.g. "qwen/qwen2.5-vl-32b-instruct:free")
//! - `stage` — dispatch stage that produced the result
//! - `status` — outcome: "ok" or "error"

/// Total dispatch calls completed, by terminal stage.
///
/// Labels: `stage`.
pub const DISPATCHES_TOTAL: &str = "sleipnir_dispatches_total";

/// End-to-end dispatch duration in seconds.
///
/// Labels: `stage`.
pub const DISPATCH_DURATION_SECONDS: &str = "sleipnir_dispatch_duration_seconds";

/// Total individual backend attempts, by outcome.
///
/// Labels: `backend`, `status` ("ok" | "error").
pub const ATTEMPTS_TOTAL: &str = "sleipnir_attempts_total";

/// Backend attempt duration in seconds.
///
/// Labels: `backend`.
pub const ATTEMPT_DURATION_SECONDS: &str = "sleipnir_attempt_duration_seconds";

/// Total response cache hits.
pub const CACHE_HITS_TOTAL: &str = "sleipnir_cache_hits_total";

/// Total response cache misses.
pub const CACHE_MISSES_TOTAL: &str = "sleipnir_cache_misses_total";

/// Total parallel races started.
pub const RACES_TOTAL: &str = "sleipnir_races_total";

/// Total dispatches answered by the static offline fallback.
pub const STATIC_FALLBACKS_TOTAL: &str = "sleipnir_static_fallbacks_total";
