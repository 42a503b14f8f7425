//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, cache-policy
//! classification and asset lookup.

use hyper::header::{HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_RANGE, RANGE};
use hyper::{Method, Request, StatusCode};

use crate::assets;
use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, HttpResponse};
use crate::logger;
use crate::policy;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
    pub if_range: Option<&'a str>,
    pub range: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let header = move |name: HeaderName| req.headers().get(name).and_then(|v| v.to_str().ok());
        Self {
            path: req.uri().path(),
            is_head: req.method() == Method::HEAD,
            if_none_match: header(IF_NONE_MATCH),
            if_modified_since: header(IF_MODIFIED_SINCE),
            if_range: header(IF_RANGE),
            range: header(RANGE),
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Pure with respect to shared state: nothing is awaited or mutated. The
/// request body is never read, so any body type is accepted.
pub fn route_request<B>(req: &Request<B>, state: &AppState) -> HttpResponse {
    if let Some(resp) = check_http_method(req.method(), state.config.http.enable_cors) {
        return resp;
    }

    let ctx = RequestContext::from_request(req);
    let directive = policy::classify(&assets::decode(ctx.path));

    let Some(asset) = state.assets.resolve(ctx.path) else {
        return http::build_404_response();
    };

    let mut resp = static_files::serve_asset(&ctx, asset);
    if carries_cache_directive(resp.status()) {
        directive.apply(resp.headers_mut());
    }
    resp
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<HttpResponse> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Responses that represent the asset get its caching headers; errors do not
fn carries_cache_directive(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::OK | StatusCode::PARTIAL_CONTENT | StatusCode::NOT_MODIFIED
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Asset, AssetStore};
    use crate::cli::Cli;
    use crate::config::Config;
    use crate::policy::SERVICE_WORKER_ALLOWED;
    use clap::Parser;
    use hyper::header::{ALLOW, CACHE_CONTROL, CONTENT_TYPE, ETAG};

    const IMMUTABLE: &str = "public, max-age=31536000, immutable";

    fn state() -> AppState {
        let cli = Cli::parse_from(["filekey-server", "--config", "/nonexistent/filekey.toml"]);
        let config = Config::load_from(&cli, None).unwrap();
        AppState::new(config, AssetStore::embedded().unwrap())
    }

    fn get(state: &AppState, uri: &str) -> HttpResponse {
        let req = Request::get(uri).body(()).unwrap();
        route_request(&req, state)
    }

    #[test]
    fn test_service_worker_headers() {
        let resp = get(&state(), "/sw.js");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CACHE_CONTROL], "no-store");
        assert_eq!(resp.headers()[&SERVICE_WORKER_ALLOWED], "/");
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/javascript; charset=utf-8");
    }

    #[test]
    fn test_entry_points_revalidate() {
        let state = state();
        for path in ["/", "/index.html", "/manifest.json"] {
            let resp = get(&state, path);
            assert_eq!(resp.status(), StatusCode::OK, "{path}");
            assert_eq!(resp.headers()[CACHE_CONTROL], "no-cache", "{path}");
            assert!(resp.headers().get(&SERVICE_WORKER_ALLOWED).is_none(), "{path}");
        }
    }

    #[test]
    fn test_root_serves_index() {
        let state = state();
        let root = get(&state, "/");
        let index = get(&state, "/index.html");
        assert_eq!(root.headers()[ETAG], index.headers()[ETAG]);
        assert_eq!(root.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
    }

    #[test]
    fn test_bundled_assets_are_immutable() {
        let resp = get(&state(), "/logo.svg");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CACHE_CONTROL], IMMUTABLE);
    }

    #[test]
    fn test_query_string_does_not_affect_policy() {
        let resp = get(&state(), "/sw.js?v=3");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CACHE_CONTROL], "no-store");
    }

    #[test]
    fn test_policy_sees_decoded_path() {
        let resp = get(&state(), "/sw%2Ejs");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CACHE_CONTROL], "no-store");
        assert_eq!(resp.headers()[&SERVICE_WORKER_ALLOWED], "/");
    }

    #[test]
    fn test_not_found() {
        let resp = get(&state(), "/does-not-exist.xyz");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.headers().get(CACHE_CONTROL).is_none());
    }

    #[test]
    fn test_not_modified_keeps_directive() {
        let state = state();
        let etag = get(&state, "/sw.js").headers()[ETAG].clone();
        let req = Request::get("/sw.js")
            .header(IF_NONE_MATCH, etag)
            .body(())
            .unwrap();
        let resp = route_request(&req, &state);
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(resp.headers()[CACHE_CONTROL], "no-store");
        assert_eq!(resp.headers()[&SERVICE_WORKER_ALLOWED], "/");
    }

    #[test]
    fn test_range_keeps_directive() {
        let req = Request::get("/logo.svg")
            .header(RANGE, "bytes=0-3")
            .body(())
            .unwrap();
        let resp = route_request(&req, &state());
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[CACHE_CONTROL], IMMUTABLE);
    }

    #[test]
    fn test_unsatisfiable_range_has_no_directive() {
        let req = Request::get("/logo.svg")
            .header(RANGE, "bytes=999999-")
            .body(())
            .unwrap();
        let resp = route_request(&req, &state());
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert!(resp.headers().get(CACHE_CONTROL).is_none());
    }

    #[test]
    fn test_methods() {
        let state = state();
        let post = Request::post("/sw.js").body(()).unwrap();
        let resp = route_request(&post, &state);
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], "GET, HEAD, OPTIONS");

        let options = Request::options("/").body(()).unwrap();
        assert_eq!(route_request(&options, &state).status(), StatusCode::NO_CONTENT);

        let head = Request::head("/sw.js").body(()).unwrap();
        let resp = route_request(&head, &state);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CACHE_CONTROL], "no-store");
    }

    #[test]
    fn test_custom_store() {
        let cli = Cli::parse_from(["filekey-server", "--config", "/nonexistent/filekey.toml"]);
        let config = Config::load_from(&cli, None).unwrap();
        let assets = AssetStore::from_entries([
            Asset::new("index.html", "<p>hi</p>", None),
            Asset::new("assets/app.abc123.js", "1", None),
        ]);
        let state = AppState::new(config, assets);

        let resp = get(&state, "/assets/app.abc123.js");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CACHE_CONTROL], IMMUTABLE);

        let resp = get(&state, "/sw.js");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
