//! End-to-end tests for the dispatch ladder.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use sleipnir::{
    Backend, BackendInvoker, BackendRegistry, CacheConfig, DispatchError, DispatchObserver,
    DispatchStage, Dispatcher, InvokePayload, RequestContext, Result, SizeClass,
};

// ============================================================================
// Mock invokers
// ============================================================================

/// Succeeds only for the named backend; records every call.
struct OnlySucceeds {
    winner: &'static str,
    calls: Mutex<Vec<String>>,
}

impl OnlySucceeds {
    fn new(winner: &'static str) -> Arc<Self> {
        Arc::new(Self {
            winner,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendInvoker for OnlySucceeds {
    async fn invoke(&self, backend: &Backend, _payload: &InvokePayload) -> Result<String> {
        self.calls.lock().unwrap().push(backend.name().to_string());
        if backend.name() == self.winner {
            Ok(format!("answer from {}", backend.name()))
        } else {
            Err(DispatchError::Transport("connection refused".into()))
        }
    }
}

/// Fails every attempt immediately.
struct AlwaysFails {
    calls: Mutex<usize>,
}

impl AlwaysFails {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(0),
        })
    }

    fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl BackendInvoker for AlwaysFails {
    async fn invoke(&self, _backend: &Backend, _payload: &InvokePayload) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        Err(DispatchError::BackendRejected {
            status: 503,
            message: "overloaded".into(),
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn small_registry() -> BackendRegistry {
    BackendRegistry::new(vec![
        Backend::new("alpha", SizeClass::Medium),
        Backend::new("beta", SizeClass::Medium),
        Backend::new("gamma", SizeClass::Medium),
    ])
    .unwrap()
}

fn dispatcher_with(invoker: Arc<dyn BackendInvoker>) -> Dispatcher {
    Dispatcher::builder()
        .invoker(invoker)
        .registry(small_registry())
        .build()
        .unwrap()
}

// ============================================================================
// Happy path and stage progression
// ============================================================================

#[tokio::test]
async fn first_candidate_success_completes_at_primary() {
    let invoker = OnlySucceeds::new("alpha");
    let dispatcher = dispatcher_with(invoker.clone());

    let response = dispatcher
        .dispatch(&RequestContext::new("mild fever"))
        .await
        .unwrap();

    assert_eq!(response.stage, DispatchStage::Primary);
    assert_eq!(response.backend.as_deref(), Some("alpha"));
    assert_eq!(invoker.calls(), ["alpha"]);
}

#[tokio::test]
async fn primary_failure_escalates_to_sequential_fallback() {
    let invoker = OnlySucceeds::new("gamma");
    let dispatcher = dispatcher_with(invoker.clone());

    let response = dispatcher
        .dispatch(&RequestContext::new("mild fever"))
        .await
        .unwrap();

    assert_eq!(response.stage, DispatchStage::SequentialFallback);
    assert_eq!(response.backend.as_deref(), Some("gamma"));
    assert_eq!(invoker.calls(), ["alpha", "beta", "gamma"]);
}

#[tokio::test]
async fn full_exhaustion_returns_static_fallback_not_error() {
    let invoker = AlwaysFails::new();
    let dispatcher = dispatcher_with(invoker.clone());

    let response = dispatcher
        .dispatch(&RequestContext::new("high fever and chills since last night"))
        .await
        .unwrap();

    assert_eq!(response.stage, DispatchStage::StaticFallback);
    assert!(response.backend.is_none());
    // The fever-category canned answer, flagged as degraded service.
    assert!(response.text.contains("temporarily unavailable"));
    assert!(response.text.contains("Viral infection"));
    // Primary (1) + sequential remainder (2) + race over top 3.
    assert_eq!(invoker.call_count(), 6);
}

#[tokio::test]
async fn static_fallback_result_is_not_cached() {
    let invoker = AlwaysFails::new();
    let dispatcher = dispatcher_with(invoker.clone());
    let ctx = RequestContext::new("fever");

    let first = dispatcher.dispatch(&ctx).await.unwrap();
    assert_eq!(first.stage, DispatchStage::StaticFallback);
    let calls_after_first = invoker.call_count();

    // Backends are retried on the next identical request.
    let second = dispatcher.dispatch(&ctx).await.unwrap();
    assert_eq!(second.stage, DispatchStage::StaticFallback);
    assert!(invoker.call_count() > calls_after_first);
}

// ============================================================================
// Request validation
// ============================================================================

#[tokio::test]
async fn unknown_backend_fails_before_any_network_call() {
    let invoker = OnlySucceeds::new("alpha");
    let dispatcher = dispatcher_with(invoker.clone());

    let err = dispatcher
        .dispatch(&RequestContext::new("fever").backend("missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::UnknownBackend(name) if name == "missing"));
    assert!(invoker.calls().is_empty());
}

#[tokio::test]
async fn empty_input_is_rejected() {
    let dispatcher = dispatcher_with(OnlySucceeds::new("alpha"));

    let err = dispatcher
        .dispatch(&RequestContext::new("   \n  "))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidInput(_)));
}

#[tokio::test]
async fn explicit_backend_gets_first_attempt() {
    let invoker = OnlySucceeds::new("gamma");
    let dispatcher = dispatcher_with(invoker.clone());

    let response = dispatcher
        .dispatch(&RequestContext::new("fever").backend("gamma"))
        .await
        .unwrap();

    assert_eq!(response.stage, DispatchStage::Primary);
    assert_eq!(invoker.calls(), ["gamma"]);
}

// ============================================================================
// Caching
// ============================================================================

#[tokio::test]
async fn repeat_request_is_served_from_cache() {
    let invoker = OnlySucceeds::new("alpha");
    let dispatcher = dispatcher_with(invoker.clone());
    let ctx = RequestContext::new("persistent fever");

    let first = dispatcher.dispatch(&ctx).await.unwrap();
    let second = dispatcher.dispatch(&ctx).await.unwrap();

    assert_eq!(first.stage, DispatchStage::Primary);
    assert_eq!(second.stage, DispatchStage::CacheCheck);
    assert_eq!(second.text, first.text);
    assert_eq!(second.backend.as_deref(), Some("alpha"));
    assert_eq!(invoker.calls().len(), 1);
}

#[tokio::test]
async fn cache_entry_expires_after_ttl() {
    let invoker = OnlySucceeds::new("alpha");
    let dispatcher = Dispatcher::builder()
        .invoker(invoker.clone())
        .registry(small_registry())
        .cache(CacheConfig::new().ttl(Duration::from_millis(100)))
        .build()
        .unwrap();
    let ctx = RequestContext::new("fever");

    dispatcher.dispatch(&ctx).await.unwrap();
    assert_eq!(
        dispatcher.dispatch(&ctx).await.unwrap().stage,
        DispatchStage::CacheCheck
    );

    tokio::time::sleep(Duration::from_millis(150)).await;
    let after = dispatcher.dispatch(&ctx).await.unwrap();
    assert_eq!(after.stage, DispatchStage::Primary);
    assert_eq!(invoker.calls().len(), 2);
}

#[tokio::test]
async fn explicit_backend_has_its_own_cache_entry() {
    let invoker = OnlySucceeds::new("alpha");
    let dispatcher = dispatcher_with(invoker.clone());

    dispatcher
        .dispatch(&RequestContext::new("fever"))
        .await
        .unwrap();
    // Same text but pinned to a backend: separate key, fresh dispatch.
    let pinned = dispatcher
        .dispatch(&RequestContext::new("fever").backend("alpha"))
        .await
        .unwrap();

    assert_eq!(pinned.stage, DispatchStage::Primary);
    assert_eq!(invoker.calls().len(), 2);
}

// ============================================================================
// Adaptation and observation
// ============================================================================

#[tokio::test]
async fn failures_reorder_later_dispatches() {
    let invoker = OnlySucceeds::new("beta");
    let dispatcher = dispatcher_with(invoker.clone());

    // alpha fails, beta wins. alpha's score worsens, beta's improves.
    dispatcher
        .dispatch(&RequestContext::new("first request"))
        .await
        .unwrap();

    let response = dispatcher
        .dispatch(&RequestContext::new("second request"))
        .await
        .unwrap();

    // beta now outranks alpha and is tried first.
    assert_eq!(response.stage, DispatchStage::Primary);
    assert_eq!(response.backend.as_deref(), Some("beta"));
}

#[tokio::test]
async fn performance_snapshot_reflects_attempts() {
    let invoker = OnlySucceeds::new("beta");
    let dispatcher = dispatcher_with(invoker.clone());

    dispatcher
        .dispatch(&RequestContext::new("fever"))
        .await
        .unwrap();

    let perf = dispatcher.performance();
    assert!(perf["alpha"].success_rate < 0.9);
    assert!(perf["beta"].success_rate > 0.9);
    assert!(!perf.contains_key("gamma"));
}

struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl DispatchObserver for RecordingObserver {
    fn started(&self, _input_len: usize) {
        self.events.lock().unwrap().push("started".into());
    }

    fn escalated(&self, stage: DispatchStage) {
        self.events
            .lock()
            .unwrap()
            .push(format!("escalated:{stage}"));
    }

    fn completed(&self, stage: DispatchStage, backend: Option<&str>) {
        self.events
            .lock()
            .unwrap()
            .push(format!("completed:{stage}:{}", backend.unwrap_or("-")));
    }
}

#[tokio::test]
async fn observer_sees_every_escalation() {
    let observer = Arc::new(RecordingObserver {
        events: Mutex::new(Vec::new()),
    });
    let dispatcher = Dispatcher::builder()
        .invoker(AlwaysFails::new())
        .registry(small_registry())
        .observer(observer.clone())
        .build()
        .unwrap();

    dispatcher
        .dispatch(&RequestContext::new("fever"))
        .await
        .unwrap();

    let events = observer.events.lock().unwrap().clone();
    assert_eq!(
        events,
        [
            "started",
            "escalated:sequential_fallback",
            "escalated:parallel_race",
            "escalated:static_fallback",
            "completed:static_fallback:-",
        ]
    );
}

#[tokio::test]
async fn shared_tracker_carries_history_between_dispatchers() {
    let invoker = OnlySucceeds::new("beta");
    let first = dispatcher_with(invoker.clone());
    first
        .dispatch(&RequestContext::new("warm up"))
        .await
        .unwrap();

    let second = Dispatcher::builder()
        .invoker(invoker.clone())
        .registry(small_registry())
        .tracker(first.tracker())
        .build()
        .unwrap();

    let response = second
        .dispatch(&RequestContext::new("new request"))
        .await
        .unwrap();
    assert_eq!(response.backend.as_deref(), Some("beta"));
    assert_eq!(response.stage, DispatchStage::Primary);
}
