//! Edge functions subsystem.
//!
//! # Data Flow
//! ```text
//! Viewer request
//!     → viewer_request.rs (gate: forward or synthesize 403)
//!     → [origin fetch, owned by the host]
//!     → viewer_response.rs (tag cache-control)
//!     → Viewer response
//! ```
//!
//! # Design Decisions
//! - Handlers are pure functions over owned event values
//! - No state survives an invocation
//! - Image classification is shared (classify.rs) so both stages agree

pub mod classify;
pub mod event;
pub mod viewer_request;
pub mod viewer_response;

pub use event::{
    FieldMap, FieldValue, Request, RequestOutcome, Response, ViewerRequestEvent,
    ViewerResponseEvent,
};
