//! Edge cache control.
//!
//! Two edge functions and a small host that runs them in front of an origin:
//!
//! - the viewer-request function rejects `.png`/`.jpg` requests that lack the
//!   `?h=<hash>` cache-busting parameter with a 403;
//! - the viewer-response function marks hashed images immutable for a year
//!   and makes everything else revalidate.

pub mod config;
pub mod error;
pub mod functions;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::EdgeConfig;
pub use error::EdgeError;
pub use http::EdgeServer;
pub use lifecycle::{Shutdown, ShutdownListener};
