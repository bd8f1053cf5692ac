//! Viewer-response function: choose the cache policy.
//!
//! Hashed image URLs are content-addressed and cached for a year. Everything
//! else must revalidate. Unhashed images are not rejected again here; they
//! simply get the short policy.

use crate::functions::classify::{has_hash, is_image_request};
use crate::functions::event::{Request, Response, ViewerResponseEvent};

pub const CACHE_CONTROL: &str = "cache-control";
pub const IMMUTABLE: &str = "public, max-age=31536000, immutable";
pub const MUST_REVALIDATE: &str = "public, max-age=0, must-revalidate";

/// Set `cache-control` on the response and return it.
pub fn handle(event: ViewerResponseEvent) -> Response {
    let ViewerResponseEvent {
        request,
        mut response,
    } = event;

    response.set_header(CACHE_CONTROL, cache_policy(&request));
    response
}

/// The `cache-control` value for a request.
pub fn cache_policy(request: &Request) -> &'static str {
    if is_image_request(&request.uri) && has_hash(&request.querystring) {
        IMMUTABLE
    } else {
        MUST_REVALIDATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(request: Request, response: Response) -> Response {
        handle(ViewerResponseEvent { request, response })
    }

    #[test]
    fn test_hashed_image_is_immutable() {
        let request = Request::new("/a/b/photo.png").with_query("h", "abc123");
        let response = tag(request, Response::new(200));
        assert_eq!(response.header(CACHE_CONTROL), Some(IMMUTABLE));
    }

    #[test]
    fn test_everything_else_revalidates() {
        let cases = [
            Request::new("/index.html"),
            Request::new("/index.html").with_query("h", "abc"),
            Request::new("/photo.png"),
            Request::new("/logo.PNG").with_query("h", "abc"),
        ];
        for request in cases {
            let response = tag(request.clone(), Response::new(200));
            assert_eq!(
                response.header(CACHE_CONTROL),
                Some(MUST_REVALIDATE),
                "request {request:?}"
            );
        }
    }

    #[test]
    fn test_other_fields_untouched() {
        let mut origin = Response::new(404);
        origin.status_description = Some("Not Found".into());
        origin.set_header("content-type", "text/html");
        origin.set_header(CACHE_CONTROL, "no-store");

        let response = tag(Request::new("/missing.html"), origin.clone());

        assert_eq!(response.status_code, 404);
        assert_eq!(response.status_description.as_deref(), Some("Not Found"));
        assert_eq!(response.header("content-type"), Some("text/html"));
        assert_eq!(response.header(CACHE_CONTROL), Some(MUST_REVALIDATE));
        assert_eq!(response.headers.len(), origin.headers.len());
    }
}
