//! Edge function pipeline.
//!
//! # Responsibilities
//! - Translate HTTP requests/responses into the edge event model
//! - Run the viewer-request function; answer directly if it responds
//! - Run the viewer-response function on whatever the origin returned
//! - Apply only what a function changed back onto the HTTP message
//!
//! # Design Decisions
//! - Header changes are applied as a diff, so multi-valued headers the
//!   function never touched (e.g. `set-cookie`) keep every value
//! - A header the function rewrites ends up with exactly one value
//! - A response generated by the viewer-request function skips the
//!   viewer-response function
//! - Function results that cannot be expressed in HTTP become 502

use axum::{
    body::Body,
    extract::Request,
    http::{uri::PathAndQuery, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use hyper::ext::ReasonPhrase;
use url::form_urlencoded;

use crate::error::EdgeError;
use crate::functions::{
    viewer_request, viewer_response, FieldMap, FieldValue, Request as EdgeRequest,
    RequestOutcome, Response as EdgeResponse, ViewerRequestEvent, ViewerResponseEvent,
};
use crate::http::request::request_id;

/// Axum middleware running both edge functions around the inner service.
pub async fn edge_functions(request: Request, next: Next) -> Response {
    run_pipeline(request, next)
        .await
        .unwrap_or_else(|e| e.into_response())
}

async fn run_pipeline(request: Request, next: Next) -> Result<Response, EdgeError> {
    let request_id = request_id(&request).to_string();
    let viewer = to_event_request(&request);

    let forwarded = match viewer_request::handle(ViewerRequestEvent {
        request: viewer.clone(),
    }) {
        RequestOutcome::Respond(generated) => {
            tracing::info!(
                request_id = %request_id,
                uri = %viewer.uri,
                status = generated.status_code,
                "Viewer request answered by edge function"
            );
            return to_http_response(generated);
        }
        RequestOutcome::Forward(forwarded) => forwarded,
    };

    let request = apply_request(&viewer, &forwarded, request)?;
    let response = next.run(request).await;

    let origin = to_event_response(&response);
    let tagged = viewer_response::handle(ViewerResponseEvent {
        request: forwarded,
        response: origin.clone(),
    });

    tracing::debug!(
        request_id = %request_id,
        status = tagged.status_code,
        cache_control = tagged.header(viewer_response::CACHE_CONTROL).unwrap_or(""),
        "Viewer response tagged"
    );

    apply_response(&origin, &tagged, response)
}

/// Build the event view of an HTTP request.
pub fn to_event_request<B>(request: &axum::http::Request<B>) -> EdgeRequest {
    EdgeRequest {
        method: request.method().as_str().to_string(),
        uri: request.uri().path().to_string(),
        querystring: parse_query(request.uri().query().unwrap_or("")),
        headers: to_field_map(request.headers()),
    }
}

/// Build the event view of an HTTP response.
pub fn to_event_response<B>(response: &axum::http::Response<B>) -> EdgeResponse {
    let status = response.status();
    let status_description = response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
        .or_else(|| status.canonical_reason())
        .map(str::to_string);

    EdgeResponse {
        status_code: status.as_u16(),
        status_description,
        headers: to_field_map(response.headers()),
    }
}

/// Turn a function-generated response into an HTTP response with no body.
pub fn to_http_response(generated: EdgeResponse) -> Result<Response, EdgeError> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = to_status(generated.status_code)?;
    if let Some(description) = &generated.status_description {
        set_reason(&mut response, description);
    }
    apply_headers(&FieldMap::new(), &generated.headers, response.headers_mut())?;
    Ok(response)
}

/// Decode a query string; the first occurrence of a key wins.
pub fn parse_query(query: &str) -> FieldMap {
    let mut map = FieldMap::new();
    for (name, value) in form_urlencoded::parse(query.as_bytes()) {
        map.entry(name.into_owned())
            .or_insert_with(|| FieldValue::new(value));
    }
    map
}

/// Build the event view of a header map.
///
/// Repeated fields are combined into one comma-separated value, so the view
/// differs from any single value a function writes back and the write
/// replaces every original line.
fn to_field_map(headers: &HeaderMap) -> FieldMap {
    let mut map = FieldMap::new();
    for name in headers.keys() {
        let values: Result<Vec<&str>, _> =
            headers.get_all(name).iter().map(|v| v.to_str()).collect();
        // Opaque (non visible-ASCII) values are not exposed to functions
        if let Ok(values) = values {
            map.insert(name.as_str().to_string(), FieldValue::new(values.join(", ")));
        }
    }
    map
}

fn apply_request(
    before: &EdgeRequest,
    after: &EdgeRequest,
    mut request: Request,
) -> Result<Request, EdgeError> {
    if after.method != before.method {
        *request.method_mut() = Method::from_bytes(after.method.as_bytes())
            .map_err(|_| EdgeError::InvalidMethod(after.method.clone()))?;
    }

    if after.uri != before.uri || after.querystring != before.querystring {
        let target = match encode_query(&after.querystring) {
            query if query.is_empty() => after.uri.clone(),
            query => format!("{}?{}", after.uri, query),
        };
        let path_and_query = PathAndQuery::try_from(target.as_str())
            .map_err(|e| EdgeError::InvalidUri(e.to_string()))?;

        let mut parts = request.uri().clone().into_parts();
        parts.path_and_query = Some(path_and_query);
        *request.uri_mut() =
            Uri::from_parts(parts).map_err(|e| EdgeError::InvalidUri(e.to_string()))?;
    }

    apply_headers(&before.headers, &after.headers, request.headers_mut())?;
    Ok(request)
}

fn apply_response(
    before: &EdgeResponse,
    after: &EdgeResponse,
    mut response: Response,
) -> Result<Response, EdgeError> {
    if after.status_code != before.status_code {
        *response.status_mut() = to_status(after.status_code)?;
    }
    if after.status_description != before.status_description {
        match &after.status_description {
            Some(description) => set_reason(&mut response, description),
            None => {
                response.extensions_mut().remove::<ReasonPhrase>();
            }
        }
    }

    apply_headers(&before.headers, &after.headers, response.headers_mut())?;
    Ok(response)
}

fn apply_headers(
    before: &FieldMap,
    after: &FieldMap,
    headers: &mut HeaderMap,
) -> Result<(), EdgeError> {
    for name in before.keys().filter(|name| !after.contains_key(*name)) {
        headers.remove(name.as_str());
    }

    for (name, value) in after {
        if before.get(name) == Some(value) {
            continue;
        }
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| EdgeError::InvalidHeaderName(name.clone()))?;
        let header_value = HeaderValue::from_str(&value.value)
            .map_err(|_| EdgeError::InvalidHeaderValue(name.clone()))?;
        headers.insert(header_name, header_value);
    }
    Ok(())
}

fn encode_query(querystring: &FieldMap) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(querystring.iter().map(|(k, v)| (k, &v.value)))
        .finish()
}

fn to_status(code: u16) -> Result<StatusCode, EdgeError> {
    StatusCode::from_u16(code).map_err(|_| EdgeError::InvalidStatus(code))
}

fn set_reason(response: &mut Response, description: &str) {
    match ReasonPhrase::try_from(description.as_bytes()) {
        Ok(reason) => {
            response.extensions_mut().insert(reason);
        }
        Err(_) => tracing::warn!(description, "Dropping unrepresentable status description"),
    }
}
