//! Event model handed to edge functions.
//!
//! Field names and nesting follow the JSON shape CDN edge runtimes use, so a
//! captured event can be deserialized as-is:
//!
//! ```json
//! {
//!   "request": {
//!     "method": "GET",
//!     "uri": "/a/b/photo.png",
//!     "querystring": { "h": { "value": "abc123" } },
//!     "headers": { "host": { "value": "cdn.example.com" } }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wrapper around a single header or query string value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldValue {
    pub value: String,
}

impl FieldValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Name → value mapping used for headers and query strings. Keys are unique.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// A viewer request as seen by an edge function.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Request {
    #[serde(default = "default_method")]
    pub method: String,

    /// Request path, without the query string.
    pub uri: String,

    #[serde(default)]
    pub querystring: FieldMap,

    #[serde(default)]
    pub headers: FieldMap,
}

fn default_method() -> String {
    "GET".to_string()
}

impl Request {
    /// Create a GET request for `uri` with no query string or headers.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            method: default_method(),
            uri: uri.into(),
            querystring: FieldMap::new(),
            headers: FieldMap::new(),
        }
    }

    /// Add a query string parameter, replacing any previous value.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.querystring.insert(name.into(), FieldValue::new(value));
        self
    }
}

/// A response, either synthesized by a function or fetched from the origin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,

    #[serde(default)]
    pub headers: FieldMap,
}

impl Response {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            status_description: None,
            headers: FieldMap::new(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|v| v.value.as_str())
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), FieldValue::new(value));
    }
}

/// Event for the viewer-request stage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ViewerRequestEvent {
    pub request: Request,
}

/// Event for the viewer-response stage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ViewerResponseEvent {
    pub request: Request,
    pub response: Response,
}

/// Result of a viewer-request function.
///
/// Serialized untagged: the JSON form is exactly the request or the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestOutcome {
    /// Continue to the origin with this request.
    Forward(Request),
    /// Answer the viewer directly.
    Respond(Response),
}
