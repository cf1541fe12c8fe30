//! Dispatch lifecycle notifications.

use crate::types::DispatchStage;

/// Receives push notifications as a dispatch moves through its stages.
///
/// All methods have no-op defaults; implement only what you need.
/// Callbacks run inline on the dispatch task, so they should return
/// quickly.
pub trait DispatchObserver: Send + Sync {
    /// A dispatch has started.
    fn started(&self, _input_len: usize) {}

    /// The dispatcher escalated to the next stage.
    fn escalated(&self, _stage: DispatchStage) {}

    /// The dispatch finished at the given stage.
    fn completed(&self, _stage: DispatchStage, _backend: Option<&str>) {}
}

/// The default observer: ignores everything.
pub(crate) struct NoopObserver;

impl DispatchObserver for NoopObserver {}
