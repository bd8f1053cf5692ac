//! Origin forwarding.
//!
//! # Responsibilities
//! - Point the request at the configured origin
//! - Forward with a shared, pooled client
//! - Stream the origin response back without buffering
//!
//! # Design Decisions
//! - Viewer headers (including Host) are forwarded unchanged
//! - Requests go to the origin as HTTP/1.1 regardless of viewer protocol
//! - Connection failures surface as 502 Bad Gateway

use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Uri, Version,
    },
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::{OriginConfig, TimeoutConfig};
use crate::error::EdgeError;
use crate::http::request::request_id;

/// Client bound to a single origin server.
#[derive(Clone)]
pub struct Origin {
    client: Client<HttpConnector, Body>,
    authority: Authority,
}

impl Origin {
    pub fn new(config: &OriginConfig, timeouts: &TimeoutConfig) -> Result<Self, EdgeError> {
        let authority: Authority = config
            .address
            .parse()
            .map_err(|e: axum::http::uri::InvalidUri| EdgeError::InvalidUri(e.to_string()))?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self { client, authority })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Send the request to the origin and return its response.
    pub async fn forward(&self, request: Request) -> Result<Response, EdgeError> {
        let (mut parts, body) = request.into_parts();

        let mut uri_parts = parts.uri.clone().into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(self.authority.clone());
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        parts.uri = Uri::from_parts(uri_parts).map_err(|e| EdgeError::InvalidUri(e.to_string()))?;
        parts.version = Version::HTTP_11;

        let response = self
            .client
            .request(Request::from_parts(parts, body))
            .await?;

        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// Fallback handler: everything the edge functions let through goes here.
pub async fn origin_handler(State(origin): State<Origin>, request: Request) -> Response {
    let request_id = request_id(&request).to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %request.method(),
        path = %path,
        origin = %origin.authority,
        "Forwarding to origin"
    );

    match origin.forward(request).await {
        Ok(response) => {
            tracing::debug!(
                request_id = %request_id,
                status = %response.status(),
                "Origin responded"
            );
            response
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, path = %path, "Origin unreachable");
            e.into_response()
        }
    }
}
