//! Attempt executors.
//!
//! A single attempt is one invoker call bounded by the backend's
//! per-attempt timeout, with the outcome fed back into the performance
//! tracker. The two strategies built on top of it:
//!
//! - [`sequential::run_sequential`] walks candidates in order, one at a
//!   time, until one succeeds.
//! - [`race::run_race`] launches several candidates concurrently and
//!   takes the first success, cancelling the rest.

pub(crate) mod race;
pub(crate) mod sequential;

use std::time::Instant;

use tracing::debug;

use crate::error::{DispatchError, Result};
use crate::invoke::{BackendInvoker, InvokePayload};
use crate::registry::Backend;
use crate::telemetry;
use crate::tracker::PerformanceTracker;

/// One bounded attempt against a backend, with tracker feedback.
///
/// The per-attempt timeout comes from the backend's registry entry. A
/// timed-out or failed attempt is recorded as a failure; the elapsed
/// wall time is recorded either way. Cancellation (the caller dropping
/// this future) records nothing.
pub(crate) async fn attempt(
    invoker: &dyn BackendInvoker,
    tracker: &PerformanceTracker,
    backend: &Backend,
    payload: &InvokePayload,
) -> Result<String> {
    let started = Instant::now();
    let outcome = tokio::time::timeout(backend.attempt_timeout(), invoker.invoke(backend, payload))
        .await
        .unwrap_or(Err(DispatchError::Timeout));
    let elapsed = started.elapsed();

    let success = outcome.is_ok();
    tracker.update(backend.name(), elapsed, success);

    let status = if success { "ok" } else { "error" };
    metrics::counter!(
        telemetry::ATTEMPTS_TOTAL,
        "backend" => backend.name().to_string(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        telemetry::ATTEMPT_DURATION_SECONDS,
        "backend" => backend.name().to_string()
    )
    .record(elapsed.as_secs_f64());

    if let Err(ref e) = outcome {
        debug!(
            backend = backend.name(),
            elapsed_ms = elapsed.as_millis() as u64,
            error = %e,
            "attempt failed"
        );
    }
    outcome
}
