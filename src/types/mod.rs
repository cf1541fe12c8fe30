//! Core request/response types

mod request;
mod response;

pub use request::RequestContext;
pub use response::{DispatchResponse, DispatchStage};
