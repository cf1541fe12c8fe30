//! Sleipnir - Adaptive dispatch over unreliable text-generation backends
//!
//! This crate routes generation requests across a roster of remote
//! backends, learning from every attempt. Per-backend latency and
//! success rate are tracked as exponential moving averages and combined
//! into a score that orders candidates for each request. When the best
//! candidate fails, the dispatcher escalates through a degrading ladder
//! of strategies: sequential fallback over the remaining candidates, a
//! parallel race over the top scorers, and finally a deterministic
//! offline answer, so a call never surfaces a backend failure.
//!
//! # Example
//!
//! ```rust,no_run
//! use sleipnir::{Dispatcher, RequestContext};
//!
//! #[tokio::main]
//! async fn main() -> sleipnir::Result<()> {
//!     let dispatcher = Dispatcher::builder()
//!         .openrouter("sk-or-your-key")
//!         .build()?;
//!
//!     let response = dispatcher
//!         .dispatch(&RequestContext::new(
//!             "Persistent dry cough and mild fever for three days.",
//!         ))
//!         .await?;
//!
//!     println!("[{}] {}", response.stage, response.text);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod dispatch;
pub mod error;
mod exec;
pub mod invoke;
pub mod registry;
pub mod select;
pub mod telemetry;
pub mod tracker;
pub mod types;

// Re-export main types at crate root
pub use cache::CacheConfig;
pub use dispatch::{DispatchObserver, Dispatcher, DispatcherBuilder};
pub use error::{DispatchError, Result};
pub use invoke::{BackendInvoker, HttpInvoker, InvokePayload};
pub use registry::{default_backends, Backend, BackendRegistry, SizeClass};
pub use select::Selector;
pub use tracker::{PerformanceRecord, PerformanceTracker};
pub use types::{DispatchResponse, DispatchStage, RequestContext};
