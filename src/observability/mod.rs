//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging through `tracing`; every pipeline event carries the
//!   request ID
//! - Per-request spans come from tower-http's `TraceLayer`
//! - No metrics exporter

pub mod logging;
