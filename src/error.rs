//! Errors raised by the edge host.
//!
//! Edge functions themselves are infallible; these cover translating their
//! results back into HTTP and talking to the origin.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum EdgeError {
    #[error("edge function returned invalid status code {0}")]
    InvalidStatus(u16),

    #[error("edge function returned invalid method `{0}`")]
    InvalidMethod(String),

    #[error("edge function returned invalid header name `{0}`")]
    InvalidHeaderName(String),

    #[error("edge function returned invalid value for header `{0}`")]
    InvalidHeaderValue(String),

    #[error("invalid uri: {0}")]
    InvalidUri(String),

    #[error("origin request failed: {0}")]
    Origin(#[from] hyper_util::client::legacy::Error),
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Edge pipeline error");
        let message = match self {
            EdgeError::Origin(_) => "Origin request failed",
            EdgeError::InvalidUri(_) => "Invalid request target",
            _ => "The edge function returned an invalid response",
        };
        (StatusCode::BAD_GATEWAY, message).into_response()
    }
}
