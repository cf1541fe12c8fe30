//! The dispatch façade.
//!
//! [`Dispatcher`] ties the pieces together and walks the degrading
//! ladder for each request:
//!
//! ```text
//! CacheCheck -> Primary -> SequentialFallback -> ParallelRace -> StaticFallback
//! ```
//!
//! Each stage only runs when the previous one failed to produce text;
//! the static fallback cannot fail, so `dispatch` returns an error only
//! for problems with the request itself (unknown backend override,
//! empty input), never because the remote backends are down.

mod builder;
mod fallback;
mod observer;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::cache::{request_key, ResponseCache};
use crate::error::{DispatchError, Result};
use crate::exec::{race::run_race, sequential::run_sequential};
use crate::invoke::BackendInvoker;
use crate::registry::BackendRegistry;
use crate::select::Selector;
use crate::telemetry;
use crate::tracker::{PerformanceRecord, PerformanceTracker};
use crate::types::{DispatchResponse, DispatchStage, RequestContext};

pub use builder::DispatcherBuilder;
pub use observer::DispatchObserver;

pub(crate) use observer::NoopObserver;

/// Adaptive dispatcher over a roster of remote text-generation backends.
pub struct Dispatcher {
    pub(crate) invoker: Arc<dyn BackendInvoker>,
    pub(crate) registry: Arc<BackendRegistry>,
    pub(crate) tracker: Arc<PerformanceTracker>,
    pub(crate) selector: Selector,
    pub(crate) cache: ResponseCache,
    pub(crate) observer: Arc<dyn DispatchObserver>,
    pub(crate) primary_attempts: usize,
    pub(crate) race_size: usize,
    pub(crate) race_timeout: std::time::Duration,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("primary_attempts", &self.primary_attempts)
            .field("race_size", &self.race_size)
            .field("race_timeout", &self.race_timeout)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Start configuring a dispatcher.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Dispatch a request, walking the fallback ladder until something
    /// produces text.
    ///
    /// Errors are returned only for invalid requests: an unknown
    /// explicit backend or empty input. Backend failures never surface;
    /// they escalate down the ladder, terminating at the static
    /// fallback.
    #[instrument(skip_all, fields(input_len = ctx.input().len(), backend = ctx.explicit_backend()))]
    pub async fn dispatch(&self, ctx: &RequestContext) -> Result<DispatchResponse> {
        if ctx.input().trim().is_empty() {
            return Err(DispatchError::InvalidInput(
                "input text is empty".to_string(),
            ));
        }
        if let Some(name) = ctx.explicit_backend() {
            if !self.registry.contains(name) {
                return Err(DispatchError::UnknownBackend(name.to_string()));
            }
        }

        let started = Instant::now();
        self.observer.started(ctx.input().len());

        let response = self.run_ladder(ctx).await?;

        metrics::counter!(telemetry::DISPATCHES_TOTAL, "stage" => response.stage.as_str())
            .increment(1);
        metrics::histogram!(telemetry::DISPATCH_DURATION_SECONDS, "stage" => response.stage.as_str())
            .record(started.elapsed().as_secs_f64());
        self.observer
            .completed(response.stage, response.backend.as_deref());
        info!(
            stage = %response.stage,
            backend = response.backend.as_deref(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dispatch complete"
        );
        Ok(response)
    }

    async fn run_ladder(&self, ctx: &RequestContext) -> Result<DispatchResponse> {
        let key = request_key(ctx);
        if let Some(hit) = self.cache.get(key).await {
            return Ok(DispatchResponse {
                text: hit.text,
                backend: hit.backend,
                stage: DispatchStage::CacheCheck,
            });
        }

        let candidates = self.selector.select(ctx)?;
        let text = ctx.payload_text();

        // Primary: best-scored candidates only, one at a time.
        let split = self.primary_attempts.min(candidates.len());
        let (primary, remainder) = candidates.split_at(split);
        match run_sequential(self.invoker.as_ref(), &self.tracker, primary, &text).await {
            Ok((answer, backend)) => {
                self.cache.put(key, answer.clone(), Some(backend.clone())).await;
                return Ok(DispatchResponse {
                    text: answer,
                    backend: Some(backend),
                    stage: DispatchStage::Primary,
                });
            }
            Err(e) => warn!(error = %e, "primary stage failed"),
        }

        // Sequential fallback: the rest of the ordered list.
        self.observer.escalated(DispatchStage::SequentialFallback);
        match run_sequential(self.invoker.as_ref(), &self.tracker, remainder, &text).await {
            Ok((answer, backend)) => {
                self.cache.put(key, answer.clone(), Some(backend.clone())).await;
                return Ok(DispatchResponse {
                    text: answer,
                    backend: Some(backend),
                    stage: DispatchStage::SequentialFallback,
                });
            }
            Err(e) => warn!(error = %e, "sequential fallback failed"),
        }

        // Parallel race over the top-scored candidates.
        self.observer.escalated(DispatchStage::ParallelRace);
        let field = &candidates[..self.race_size.min(candidates.len())];
        match run_race(
            self.invoker.as_ref(),
            &self.tracker,
            field,
            &text,
            self.race_timeout,
        )
        .await
        {
            Ok((answer, backend)) => {
                self.cache.put(key, answer.clone(), Some(backend.clone())).await;
                return Ok(DispatchResponse {
                    text: answer,
                    backend: Some(backend),
                    stage: DispatchStage::ParallelRace,
                });
            }
            Err(e) => warn!(error = %e, "parallel race failed"),
        }

        // Terminal: deterministic canned answer, never cached.
        self.observer.escalated(DispatchStage::StaticFallback);
        metrics::counter!(telemetry::STATIC_FALLBACKS_TOTAL).increment(1);
        Ok(DispatchResponse {
            text: fallback::static_answer(ctx.input()),
            backend: None,
            stage: DispatchStage::StaticFallback,
        })
    }

    /// Current per-backend performance records, keyed by backend name.
    pub fn performance(&self) -> BTreeMap<String, PerformanceRecord> {
        self.tracker.snapshot()
    }

    /// The tracker driving candidate ordering, for sharing or
    /// inspection.
    pub fn tracker(&self) -> Arc<PerformanceTracker> {
        Arc::clone(&self.tracker)
    }
}
