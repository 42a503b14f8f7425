//! HTTP response building module
//!
//! Provides builders for the status codes the server produces, decoupled
//! from asset lookup and cache policy.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    ACCEPT_RANGES, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ALLOW, CONTENT_LENGTH, CONTENT_RANGE,
    CONTENT_TYPE, ETAG, LAST_MODIFIED,
};
use hyper::{Response, StatusCode};

/// Response type produced by every handler
pub type HttpResponse = Response<Full<Bytes>>;

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Representation headers shared by 200, 206 and 304 responses
pub struct Validators<'a> {
    pub etag: &'a str,
    pub last_modified: Option<&'a str>,
}

/// Build 200 OK response for a full asset body
///
/// `body` is empty for HEAD requests; `content_length` is always the full size.
pub fn build_asset_response(
    body: Bytes,
    content_length: usize,
    content_type: &str,
    validators: &Validators<'_>,
) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, validators.etag);
    if let Some(date) = validators.last_modified {
        builder = builder.header(LAST_MODIFIED, date);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 206 Partial Content response
pub fn build_partial_response(
    body: Bytes,
    content_length: usize,
    content_range: &str,
    content_type: &str,
    validators: &Validators<'_>,
) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(CONTENT_RANGE, content_range)
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, validators.etag);
    if let Some(date) = validators.last_modified {
        builder = builder.header(LAST_MODIFIED, date);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("206", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 304 Not Modified response
pub fn build_304_response(validators: &Validators<'_>) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, validators.etag);
    if let Some(date) = validators.last_modified {
        builder = builder.header(LAST_MODIFIED, date);
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("304", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from_static(b"404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from_static(b"404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> HttpResponse {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(ALLOW, ALLOWED_METHODS)
        .body(Full::new(Bytes::from_static(b"405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from_static(b"405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS);

    if enable_cors {
        builder = builder
            .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
            .header(ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS)
            .header(ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Range")
            .header(ACCESS_CONTROL_MAX_AGE, "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: usize) -> HttpResponse {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_RANGE, format!("bytes */{file_size}"))
        .body(Full::new(Bytes::from_static(b"416 Range Not Satisfiable")))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(Full::new(Bytes::from_static(b"416 Range Not Satisfiable")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_response_headers() {
        let validators = Validators {
            etag: "\"abc\"",
            last_modified: Some("Sun, 06 Nov 1994 08:49:37 GMT"),
        };
        let resp = build_asset_response(Bytes::from_static(b"body"), 4, "text/plain", &validators);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "4");
        assert_eq!(resp.headers()[ACCEPT_RANGES], "bytes");
        assert_eq!(resp.headers()[ETAG], "\"abc\"");
        assert_eq!(resp.headers()[LAST_MODIFIED], "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_not_found_has_no_cache_headers() {
        let resp = build_404_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers().get(hyper::header::CACHE_CONTROL).is_none());
    }

    #[test]
    fn test_options_cors() {
        let plain = build_options_response(false);
        assert_eq!(plain.status(), StatusCode::NO_CONTENT);
        assert!(plain.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

        let cors = build_options_response(true);
        assert_eq!(cors.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn test_416_content_range() {
        let resp = build_416_response(42);
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(resp.headers()[CONTENT_RANGE], "bytes */42");
    }
}
