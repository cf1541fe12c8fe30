//! Parallel race execution.
//!
//! Last escalation tier before the static fallback: launch every
//! candidate at once and take the first success. Losers are cancelled
//! by dropping their futures, so a cancelled attempt never reaches its
//! tracker update and is not punished for losing a race.

use std::time::Duration;

use futures_util::stream::{FuturesUnordered, StreamExt};
use tracing::{info, warn};

use crate::error::{DispatchError, Result};
use crate::invoke::{BackendInvoker, InvokePayload};
use crate::registry::Backend;
use crate::telemetry;
use crate::tracker::PerformanceTracker;

use super::attempt;

/// Race all candidates concurrently; first success wins.
///
/// An attempt that fails terminally before any winner still records its
/// failure; the race keeps waiting on the rest. Errors surface only as
/// [`DispatchError::AllCandidatesExhausted`] (every attempt failed) or
/// [`DispatchError::Timeout`] (the overall budget elapsed first).
pub(crate) async fn run_race(
    invoker: &dyn BackendInvoker,
    tracker: &PerformanceTracker,
    candidates: &[Backend],
    text: &str,
    overall_timeout: Duration,
) -> Result<(String, String)> {
    metrics::counter!(telemetry::RACES_TOTAL).increment(1);

    let mut attempts: FuturesUnordered<_> = candidates
        .iter()
        .map(|backend| {
            let payload = InvokePayload::for_backend(text, backend);
            async move {
                let outcome = attempt(invoker, tracker, backend, &payload).await;
                (backend.name().to_string(), outcome)
            }
        })
        .collect();

    let winner = async {
        while let Some((name, outcome)) = attempts.next().await {
            match outcome {
                Ok(answer) => {
                    info!(backend = %name, "race won");
                    return Ok((answer, name));
                }
                Err(e) => {
                    warn!(backend = %name, error = %e, "race attempt failed");
                }
            }
        }
        Err(DispatchError::AllCandidatesExhausted)
    };

    // Dropping `attempts` on timeout cancels every in-flight attempt.
    tokio::time::timeout(overall_timeout, winner)
        .await
        .unwrap_or(Err(DispatchError::Timeout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SizeClass;
    use async_trait::async_trait;
    use tokio::time::sleep;

    /// Invoker that sleeps a scripted delay per backend, then succeeds
    /// or fails.
    struct Scripted {
        script: Vec<(&'static str, Duration, bool)>,
    }

    #[async_trait]
    impl BackendInvoker for Scripted {
        async fn invoke(&self, backend: &Backend, _payload: &InvokePayload) -> Result<String> {
            let (_, delay, ok) = self
                .script
                .iter()
                .find(|(name, _, _)| *name == backend.name())
                .copied()
                .unwrap();
            sleep(delay).await;
            if ok {
                Ok(format!("answer from {}", backend.name()))
            } else {
                Err(DispatchError::Transport("connection reset".into()))
            }
        }
    }

    fn backends(names: &[&'static str]) -> Vec<Backend> {
        names
            .iter()
            .map(|n| Backend::new(*n, SizeClass::Medium))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn fastest_success_wins() {
        let invoker = Scripted {
            script: vec![
                ("slow", Duration::from_millis(200), true),
                ("fast", Duration::from_millis(50), true),
            ],
        };
        let tracker = PerformanceTracker::new();

        let (_, backend) = run_race(
            &invoker,
            &tracker,
            &backends(&["slow", "fast"]),
            "hi",
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(backend, "fast");
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_loser_is_not_penalized() {
        let invoker = Scripted {
            script: vec![
                ("slow", Duration::from_millis(200), true),
                ("fast", Duration::from_millis(50), true),
            ],
        };
        let tracker = PerformanceTracker::new();

        run_race(
            &invoker,
            &tracker,
            &backends(&["slow", "fast"]),
            "hi",
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        // The loser was cancelled mid-flight: its record stays neutral.
        let slow = tracker.record("slow");
        assert_eq!(slow.success_rate, 0.9);
        assert_eq!(slow.avg_latency, 15.0);
        assert!(tracker.record("fast").success_rate > 0.9);
    }

    #[tokio::test(start_paused = true)]
    async fn early_failure_keeps_waiting_for_slower_success() {
        let invoker = Scripted {
            script: vec![
                ("flaky", Duration::from_millis(10), false),
                ("steady", Duration::from_millis(300), true),
            ],
        };
        let tracker = PerformanceTracker::new();

        let (_, backend) = run_race(
            &invoker,
            &tracker,
            &backends(&["flaky", "steady"]),
            "hi",
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(backend, "steady");
        // The terminal failure was recorded before the winner landed.
        assert!(tracker.record("flaky").success_rate < 0.9);
    }

    #[tokio::test(start_paused = true)]
    async fn all_failures_is_exhaustion() {
        let invoker = Scripted {
            script: vec![
                ("a", Duration::from_millis(10), false),
                ("b", Duration::from_millis(20), false),
            ],
        };
        let tracker = PerformanceTracker::new();

        let err = run_race(
            &invoker,
            &tracker,
            &backends(&["a", "b"]),
            "hi",
            Duration::from_secs(5),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DispatchError::AllCandidatesExhausted));
    }

    #[tokio::test(start_paused = true)]
    async fn overall_timeout_cuts_the_race() {
        let invoker = Scripted {
            script: vec![("glacial", Duration::from_secs(60), true)],
        };
        let tracker = PerformanceTracker::new();

        let err = run_race(
            &invoker,
            &tracker,
            &backends(&["glacial"]),
            "hi",
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DispatchError::Timeout));
        // Cancelled by the race budget, so never recorded.
        assert_eq!(tracker.record("glacial").success_rate, 0.9);
    }
}
