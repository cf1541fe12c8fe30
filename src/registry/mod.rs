//! Backend registry — the static roster of candidate backends.
//!
//! The registry holds the full ordered list of known backends with their
//! per-backend tuning parameters (timeout, token budget, temperature).
//! It is read-only at runtime: the canonical order is never mutated, and
//! per-call reordering happens on working copies in the
//! [`Selector`](crate::select::Selector).

mod preset;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{DispatchError, Result};

pub use preset::default_backends;

/// Coarse backend size class, used only to pick tuning defaults.
///
/// Larger backends get longer timeouts and bigger token budgets; they
/// tend to answer better but slower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    /// Default per-attempt timeout for this class.
    pub fn default_timeout(&self) -> Duration {
        match self {
            SizeClass::Small => Duration::from_secs(10),
            SizeClass::Medium => Duration::from_secs(15),
            SizeClass::Large => Duration::from_secs(20),
        }
    }

    /// Default maximum output size in tokens.
    pub fn default_max_tokens(&self) -> u32 {
        match self {
            SizeClass::Small => 512,
            SizeClass::Medium => 800,
            SizeClass::Large => 1000,
        }
    }

    /// Default sampling temperature.
    pub fn default_temperature(&self) -> f64 {
        match self {
            SizeClass::Small => 0.3,
            SizeClass::Medium => 0.4,
            SizeClass::Large => 0.4,
        }
    }
}

/// One remote text-generation backend and its tuning parameters.
///
/// Identity is the opaque `name` string, unique within a registry.
/// Immutable after registry load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backend {
    name: String,
    size_class: SizeClass,
    timeout: Duration,
    max_tokens: u32,
    temperature: f64,
}

impl Backend {
    /// Create a backend with the tuning defaults of its size class.
    pub fn new(name: impl Into<String>, size_class: SizeClass) -> Self {
        Self {
            name: name.into(),
            size_class,
            timeout: size_class.default_timeout(),
            max_tokens: size_class.default_max_tokens(),
            temperature: size_class.default_temperature(),
        }
    }

    /// Override the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the maximum output size in tokens.
    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    /// Override the sampling temperature.
    pub fn temperature(mut self, temp: f64) -> Self {
        self.temperature = temp;
        self
    }

    /// The backend's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The backend's size class.
    pub fn size_class(&self) -> SizeClass {
        self.size_class
    }

    /// The per-attempt timeout budget.
    pub fn attempt_timeout(&self) -> Duration {
        self.timeout
    }

    /// The maximum output size in tokens.
    pub fn token_budget(&self) -> u32 {
        self.max_tokens
    }

    /// The sampling temperature.
    pub fn sampling_temperature(&self) -> f64 {
        self.temperature
    }
}

/// Static ordered list of candidate backends.
///
/// The registration order is the canonical order: it breaks score ties
/// in the selector and decides which backends join the parallel race
/// when scores are equal.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    backends: Vec<Backend>,
}

impl BackendRegistry {
    /// Build a registry from an ordered backend list.
    ///
    /// Duplicate names are rejected: the name is the backend's identity
    /// in the tracker and the cache key space.
    pub fn new(backends: Vec<Backend>) -> Result<Self> {
        for (i, backend) in backends.iter().enumerate() {
            if backends[..i].iter().any(|b| b.name == backend.name) {
                return Err(DispatchError::InvalidInput(format!(
                    "duplicate backend name: {}",
                    backend.name
                )));
            }
        }
        Ok(Self { backends })
    }

    /// Registry seeded with the default free-tier backend roster.
    pub fn with_defaults() -> Self {
        Self {
            backends: default_backends(),
        }
    }

    /// The full ordered backend list.
    pub fn backends(&self) -> &[Backend] {
        &self.backends
    }

    /// Look up a backend by name.
    pub fn get(&self, name: &str) -> Result<&Backend> {
        self.backends
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| DispatchError::UnknownBackend(name.to_string()))
    }

    /// Whether a backend with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.backends.iter().any(|b| b.name == name)
    }

    /// Number of registered backends.
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
