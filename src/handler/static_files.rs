//! Static file serving module
//!
//! Turns a resolved asset plus the request's conditional and range headers
//! into a 200, 206, 304 or 416 response.

use hyper::body::Bytes;

use crate::assets::Asset;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, response, HttpResponse, RangeParseResult, Validators};

/// Serve an asset honouring conditional and range headers
pub fn serve_asset(ctx: &RequestContext<'_>, asset: &Asset) -> HttpResponse {
    let validators = Validators {
        etag: asset.etag(),
        last_modified: asset.last_modified_header(),
    };

    // Check if client has cached version
    if cache::is_not_modified(
        ctx.if_none_match,
        ctx.if_modified_since,
        asset.etag(),
        asset.last_modified(),
    ) {
        return http::build_304_response(&validators);
    }

    let total_size = asset.size();
    let range_header = ctx
        .range
        .filter(|_| cache::if_range_matches(ctx.if_range, asset.etag(), asset.last_modified()));

    match http::parse_range_header(range_header, total_size) {
        RangeParseResult::Valid(range) => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                asset.data().slice(range.start..=range.end)
            };
            response::build_partial_response(
                body,
                range.len(),
                &range.content_range(total_size),
                asset.content_type(),
                &validators,
            )
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size),
        RangeParseResult::None => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                asset.data().clone()
            };
            response::build_asset_response(body, total_size, asset.content_type(), &validators)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use http_body_util::BodyExt;
    use hyper::header::{CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, LAST_MODIFIED};
    use hyper::StatusCode;

    fn asset() -> Asset {
        let modified = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Asset::new("assets/app.js", "0123456789", Some(modified))
    }

    fn ctx() -> RequestContext<'static> {
        RequestContext {
            path: "/assets/app.js",
            is_head: false,
            if_none_match: None,
            if_modified_since: None,
            if_range: None,
            range: None,
        }
    }

    async fn body(resp: HttpResponse) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_full_response() {
        let asset = asset();
        let resp = serve_asset(&ctx(), &asset);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/javascript; charset=utf-8");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "10");
        assert_eq!(resp.headers()[ETAG], asset.etag());
        assert_eq!(resp.headers()[LAST_MODIFIED], "Wed, 01 May 2024 12:00:00 GMT");
        assert_eq!(body(resp).await, "0123456789");
    }

    #[tokio::test]
    async fn test_head_has_headers_without_body() {
        let ctx = RequestContext { is_head: true, ..ctx() };
        let resp = serve_asset(&ctx, &asset());
        assert_eq!(resp.headers()[CONTENT_LENGTH], "10");
        assert!(body(resp).await.is_empty());
    }

    #[test]
    fn test_etag_revalidation() {
        let asset = asset();
        let ctx = RequestContext { if_none_match: Some(asset.etag()), ..ctx() };
        let resp = serve_asset(&ctx, &asset);
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(resp.headers()[ETAG], asset.etag());
    }

    #[test]
    fn test_if_modified_since() {
        let asset = asset();
        let fresh = RequestContext {
            if_modified_since: Some("Wed, 01 May 2024 12:00:00 GMT"),
            ..ctx()
        };
        assert_eq!(serve_asset(&fresh, &asset).status(), StatusCode::NOT_MODIFIED);

        let stale = RequestContext {
            if_modified_since: Some("Tue, 30 Apr 2024 12:00:00 GMT"),
            ..ctx()
        };
        assert_eq!(serve_asset(&stale, &asset).status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_range() {
        let ctx = RequestContext { range: Some("bytes=2-5"), ..ctx() };
        let resp = serve_asset(&ctx, &asset());
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[CONTENT_RANGE], "bytes 2-5/10");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "4");
        assert_eq!(body(resp).await, "2345");
    }

    #[test]
    fn test_range_not_satisfiable() {
        let ctx = RequestContext { range: Some("bytes=50-"), ..ctx() };
        let resp = serve_asset(&ctx, &asset());
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(resp.headers()[CONTENT_RANGE], "bytes */10");
    }

    #[test]
    fn test_stale_if_range_ignores_range() {
        let stale = RequestContext {
            range: Some("bytes=2-5"),
            if_range: Some("\"stale\""),
            ..ctx()
        };
        assert_eq!(serve_asset(&stale, &asset()).status(), StatusCode::OK);

        let asset = asset();
        let current = RequestContext {
            range: Some("bytes=2-5"),
            if_range: Some(asset.etag()),
            ..ctx()
        };
        assert_eq!(serve_asset(&current, &asset).status(), StatusCode::PARTIAL_CONTENT);
    }
}
