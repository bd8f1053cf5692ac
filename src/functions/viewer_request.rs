//! Viewer-request function: reject unhashed image requests.

use crate::functions::classify::{has_hash, is_image_request};
use crate::functions::event::{Request, RequestOutcome, Response, ViewerRequestEvent};

pub const REJECT_STATUS: u16 = 403;
pub const REJECT_DESCRIPTION: &str = "Forbidden";
pub const REJECT_HEADER: &str = "error";
pub const REJECT_MESSAGE: &str = "Cannot request image without hash";

/// Forward the request unless it is an image request without `?h=`.
pub fn handle(event: ViewerRequestEvent) -> RequestOutcome {
    let request = event.request;

    if is_image_request(&request.uri) && !has_hash(&request.querystring) {
        tracing::debug!(uri = %request.uri, "Rejecting image request without hash");
        return RequestOutcome::Respond(rejection());
    }

    RequestOutcome::Forward(request)
}

/// Convenience wrapper taking the bare request.
pub fn gate(request: Request) -> RequestOutcome {
    handle(ViewerRequestEvent { request })
}

fn rejection() -> Response {
    let mut response = Response::new(REJECT_STATUS);
    response.status_description = Some(REJECT_DESCRIPTION.to_string());
    response.set_header(REJECT_HEADER, REJECT_MESSAGE);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rejected(outcome: RequestOutcome) {
        let response = match outcome {
            RequestOutcome::Respond(response) => response,
            other => panic!("expected a rejection, got {other:?}"),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({
                "statusCode": 403,
                "statusDescription": "Forbidden",
                "headers": { "error": { "value": "Cannot request image without hash" } }
            })
        );
    }

    #[test]
    fn test_image_without_hash_rejected() {
        assert_rejected(gate(Request::new("/a/b/photo.png")));
        assert_rejected(gate(Request::new("/photo.jpg").with_query("v", "2")));
    }

    #[test]
    fn test_image_with_hash_forwarded_unchanged() {
        let request = Request::new("/a/b/photo.png").with_query("h", "abc123");
        assert_eq!(gate(request.clone()), RequestOutcome::Forward(request));

        let empty = Request::new("/photo.jpg").with_query("h", "");
        assert_eq!(gate(empty.clone()), RequestOutcome::Forward(empty));
    }

    #[test]
    fn test_non_image_forwarded_unchanged() {
        let plain = Request::new("/index.html");
        assert_eq!(gate(plain.clone()), RequestOutcome::Forward(plain));

        let with_query = Request::new("/app.js").with_query("x", "1");
        assert_eq!(gate(with_query.clone()), RequestOutcome::Forward(with_query));
    }

    #[test]
    fn test_uppercase_extension_forwarded() {
        let request = Request::new("/logo.PNG");
        assert_eq!(gate(request.clone()), RequestOutcome::Forward(request));
    }
}
