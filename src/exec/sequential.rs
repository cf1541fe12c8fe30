//! Sequential fallback execution.

use tracing::{info, warn};

use crate::error::{DispatchError, Result};
use crate::invoke::{BackendInvoker, InvokePayload};
use crate::registry::Backend;
use crate::tracker::PerformanceTracker;

use super::attempt;

/// Try each candidate in order until one succeeds.
///
/// Returns the winning text together with the backend name. Per-attempt
/// failures are absorbed (logged and tracked); only running out of
/// candidates surfaces as [`DispatchError::AllCandidatesExhausted`].
pub(crate) async fn run_sequential(
    invoker: &dyn BackendInvoker,
    tracker: &PerformanceTracker,
    candidates: &[Backend],
    text: &str,
) -> Result<(String, String)> {
    for backend in candidates {
        let payload = InvokePayload::for_backend(text, backend);
        match attempt(invoker, tracker, backend, &payload).await {
            Ok(answer) => {
                info!(backend = backend.name(), "sequential attempt succeeded");
                return Ok((answer, backend.name().to_string()));
            }
            Err(e) if e.is_attempt_failure() => {
                warn!(backend = backend.name(), error = %e, "falling back to next candidate");
            }
            Err(e) => return Err(e),
        }
    }
    Err(DispatchError::AllCandidatesExhausted)
}
