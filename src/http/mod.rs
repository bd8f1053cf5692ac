//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign x-request-id)
//!     → edge.rs (viewer-request function; may answer directly)
//!     → origin.rs (forward to origin)
//!     → edge.rs (viewer-response function; header diff applied)
//!     → Send to viewer
//! ```

pub mod edge;
pub mod origin;
pub mod request;
pub mod server;

pub use edge::edge_functions;
pub use origin::Origin;
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::EdgeServer;
