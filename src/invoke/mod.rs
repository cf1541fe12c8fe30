//! Backend invocation.
//!
//! [`BackendInvoker`] is the seam between the dispatch machinery and the
//! actual remote calls. Production uses [`HttpInvoker`]; tests swap in
//! scripted implementations to exercise ordering, racing, and failure
//! handling without a network.

mod http;

use async_trait::async_trait;

use crate::error::Result;
use crate::registry::Backend;

pub use http::HttpInvoker;

/// The payload for one backend attempt: the request text plus the
/// per-backend generation parameters resolved by the registry.
#[derive(Debug, Clone)]
pub struct InvokePayload {
    /// Full text to send (input plus any auxiliary context).
    pub text: String,
    /// Token budget for the response.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl InvokePayload {
    /// Build the payload for a specific backend's parameter set.
    pub fn for_backend(text: impl Into<String>, backend: &Backend) -> Self {
        Self {
            text: text.into(),
            max_tokens: backend.token_budget(),
            temperature: backend.sampling_temperature(),
        }
    }
}

/// A remote text-generation backend caller.
///
/// Implementations perform exactly one generation attempt and report
/// success or failure. They must not retry internally; retrying and
/// escalation belong to the executors. A successful return must carry
/// non-empty text.
#[async_trait]
pub trait BackendInvoker: Send + Sync {
    /// Run one generation attempt against `backend`.
    async fn invoke(&self, backend: &Backend, payload: &InvokePayload) -> Result<String>;
}
