//! Score-based candidate ordering.
//!
//! Produces the attempt order for a request: every registered backend,
//! sorted by predicted cost (lower first) for the request's complexity.
//! An explicit backend override is validated against the registry and
//! promoted to the front while the rest keep their score order.

use std::sync::Arc;

use tracing::debug;

use crate::error::{DispatchError, Result};
use crate::registry::{Backend, BackendRegistry};
use crate::tracker::PerformanceTracker;
use crate::types::RequestContext;

/// Orders registered backends by tracked performance for a given request.
pub struct Selector {
    registry: Arc<BackendRegistry>,
    tracker: Arc<PerformanceTracker>,
}

impl Selector {
    pub fn new(registry: Arc<BackendRegistry>, tracker: Arc<PerformanceTracker>) -> Self {
        Self { registry, tracker }
    }

    /// Candidate order for a request: all backends sorted by ascending
    /// score, with an explicit override promoted to the front.
    ///
    /// Returns [`DispatchError::UnknownBackend`] when the override names
    /// a backend the registry does not hold. The sort is stable, so
    /// backends with equal scores keep their registration order.
    pub fn select(&self, ctx: &RequestContext) -> Result<Vec<Backend>> {
        if let Some(name) = ctx.explicit_backend() {
            if !self.registry.contains(name) {
                return Err(DispatchError::UnknownBackend(name.to_string()));
            }
        }

        let complexity = ctx.complexity();
        let mut scored: Vec<(Backend, f64)> = self
            .registry
            .backends()
            .iter()
            .map(|backend| {
                let score = self.tracker.score(backend.name(), complexity);
                (backend.clone(), score)
            })
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut candidates: Vec<Backend> = scored.into_iter().map(|(b, _)| b).collect();

        if let Some(name) = ctx.explicit_backend() {
            if let Some(pos) = candidates.iter().position(|b| b.name() == name) {
                candidates[..=pos].rotate_right(1);
            }
        }

        debug!(
            complexity,
            order = ?candidates.iter().map(|b| b.name()).collect::<Vec<_>>(),
            "selected candidate order"
        );
        Ok(candidates)
    }
}
