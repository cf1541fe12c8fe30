//! Request context for a single dispatch call.

use serde::{Deserialize, Serialize};

/// Normalisation divisor for input complexity: inputs of 500 characters
/// or more count as maximally complex.
const COMPLEXITY_NORM: f64 = 500.0;

/// The immutable input to one dispatch call.
///
/// Carries the free-text input, an optional explicit backend override,
/// and optional auxiliary context that is merged into the payload text
/// before any backend is invoked.
///
/// ```rust
/// # use sleipnir::RequestContext;
/// let ctx = RequestContext::new("persistent headache since monday")
///     .backend("qwen/qwen2.5-vl-32b-instruct:free")
///     .aux_context("patient age: 34");
/// assert!(ctx.payload_text().contains("patient age"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aux_context: Option<String>,
}

impl RequestContext {
    /// Create a context for the given input text.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            backend: None,
            aux_context: None,
        }
    }

    /// Request a specific backend by name.
    ///
    /// The named backend is tried first; the remaining candidates stay
    /// available as fallback. An unknown name fails the dispatch
    /// synchronously with `UnknownBackend`.
    pub fn backend(mut self, name: impl Into<String>) -> Self {
        self.backend = Some(name.into());
        self
    }

    /// Attach auxiliary context merged into the payload text.
    pub fn aux_context(mut self, context: impl Into<String>) -> Self {
        self.aux_context = Some(context.into());
        self
    }

    /// The raw input text.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The explicit backend override, if any.
    pub fn explicit_backend(&self) -> Option<&str> {
        self.backend.as_deref()
    }

    /// The text actually sent to backends: input plus any auxiliary
    /// context, separated by a blank line.
    pub fn payload_text(&self) -> String {
        match &self.aux_context {
            Some(aux) if !aux.is_empty() => format!("{}\n\n{}", self.input, aux),
            _ => self.input.clone(),
        }
    }

    /// Input text with whitespace runs collapsed, for stable cache keys.
    pub(crate) fn normalized_input(&self) -> String {
        self.input.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Normalised input complexity in [0, 1].
    ///
    /// Longer inputs score higher; anything at or past 500 characters
    /// saturates at 1.0.
    pub fn complexity(&self) -> f64 {
        (self.input.len() as f64 / COMPLEXITY_NORM).clamp(0.0, 1.0)
    }
}
