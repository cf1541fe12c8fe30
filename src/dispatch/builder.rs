//! Builder for configuring dispatcher instances.

use std::sync::Arc;
use std::time::Duration;

use super::{Dispatcher, DispatchObserver, NoopObserver};
use crate::cache::{CacheConfig, ResponseCache};
use crate::error::{DispatchError, Result};
use crate::invoke::{BackendInvoker, HttpInvoker};
use crate::registry::BackendRegistry;
use crate::select::Selector;
use crate::tracker::PerformanceTracker;

/// Builder for configuring [`Dispatcher`] instances.
///
/// ```rust,no_run
/// # use sleipnir::Dispatcher;
/// # fn main() -> sleipnir::Result<()> {
/// let dispatcher = Dispatcher::builder()
///     .openrouter("sk-or-...")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct DispatcherBuilder {
    invoker: Option<Arc<dyn BackendInvoker>>,
    registry: Option<BackendRegistry>,
    tracker: Option<Arc<PerformanceTracker>>,
    cache_config: CacheConfig,
    observer: Option<Arc<dyn DispatchObserver>>,
    primary_attempts: usize,
    race_size: usize,
    race_timeout: Duration,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            invoker: None,
            registry: None,
            tracker: None,
            cache_config: CacheConfig::default(),
            observer: None,
            primary_attempts: 1,
            race_size: 4,
            race_timeout: Duration::from_secs(30),
        }
    }

    /// Dispatch over the OpenRouter HTTP API with this key.
    pub fn openrouter(mut self, api_key: impl Into<String>) -> Self {
        self.invoker = Some(Arc::new(HttpInvoker::new(api_key)));
        self
    }

    /// Dispatch through a custom invoker (tests, proxies, other wire
    /// protocols).
    pub fn invoker(mut self, invoker: Arc<dyn BackendInvoker>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    /// Use a custom backend roster instead of [`default_backends`].
    pub fn registry(mut self, registry: BackendRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Share a performance tracker with other dispatchers, or inject a
    /// pre-warmed one.
    pub fn tracker(mut self, tracker: Arc<PerformanceTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Override the response cache configuration.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Receive lifecycle notifications for every dispatch.
    pub fn observer(mut self, observer: Arc<dyn DispatchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// How many best-scored candidates the primary stage tries before
    /// escalating to full sequential fallback. Default: 1.
    pub fn primary_attempts(mut self, n: usize) -> Self {
        self.primary_attempts = n.max(1);
        self
    }

    /// How many top-scored candidates enter the parallel race.
    /// Default: 4.
    pub fn race_size(mut self, n: usize) -> Self {
        self.race_size = n.max(1);
        self
    }

    /// Overall wall-clock budget for the parallel race. Default: 30s.
    pub fn race_timeout(mut self, timeout: Duration) -> Self {
        self.race_timeout = timeout;
        self
    }

    /// Build the dispatcher.
    ///
    /// Fails with [`DispatchError::Configuration`] when no invoker was
    /// configured or the registry is empty.
    pub fn build(self) -> Result<Dispatcher> {
        let invoker = self.invoker.ok_or_else(|| {
            DispatchError::Configuration(
                "no invoker configured; call .openrouter(key) or .invoker(...)".to_string(),
            )
        })?;

        let registry = self.registry.unwrap_or_else(BackendRegistry::with_defaults);
        if registry.is_empty() {
            return Err(DispatchError::Configuration(
                "backend registry is empty".to_string(),
            ));
        }
        let registry = Arc::new(registry);

        let tracker = self
            .tracker
            .unwrap_or_else(|| Arc::new(PerformanceTracker::new()));
        let observer = self
            .observer
            .unwrap_or_else(|| Arc::new(NoopObserver) as Arc<dyn DispatchObserver>);

        Ok(Dispatcher {
            invoker,
            selector: Selector::new(Arc::clone(&registry), Arc::clone(&tracker)),
            registry,
            tracker,
            cache: ResponseCache::new(&self.cache_config),
            observer,
            primary_attempts: self.primary_attempts,
            race_size: self.race_size,
            race_timeout: self.race_timeout,
        })
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
