//! Cache-policy routing
//!
//! Maps a request path to the caching headers its response must carry.
//! The rule depends on the path alone:
//!
//! | Path                                   | `Cache-Control`                       |
//! |----------------------------------------|---------------------------------------|
//! | `/sw.js`                               | `no-store` (+ `Service-Worker-Allowed`) |
//! | `/`, `/index.html`, `/manifest.json`   | `no-cache`                            |
//! | anything else                          | `public, max-age=31536000, immutable` |
//!
//! Entry points keep stable names across deploys; every other bundled file
//! is assumed to carry a content hash in its name.

use hyper::header::{HeaderName, HeaderValue, CACHE_CONTROL};
use hyper::HeaderMap;

use crate::http::cache::CachePolicy;

/// Path of the service worker script
pub const SERVICE_WORKER_PATH: &str = "/sw.js";

/// Mutable entry points served under stable names
pub const ENTRY_POINTS: [&str; 3] = ["/", "/index.html", "/manifest.json"];

/// Widens the scope a service worker may control
pub static SERVICE_WORKER_ALLOWED: HeaderName = HeaderName::from_static("service-worker-allowed");

/// Caching headers for one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDirective {
    pub cache_control: CachePolicy,
    pub extra_headers: HeaderMap,
}

impl CacheDirective {
    fn new(cache_control: CachePolicy) -> Self {
        Self {
            cache_control,
            extra_headers: HeaderMap::new(),
        }
    }

    /// `Cache-Control` header value
    pub fn cache_control_value(&self) -> String {
        self.cache_control.to_header_value()
    }

    /// Write the directive into a response's headers, replacing existing values
    pub fn apply(&self, headers: &mut HeaderMap) {
        match HeaderValue::try_from(self.cache_control_value()) {
            Ok(value) => {
                headers.insert(CACHE_CONTROL, value);
            }
            Err(e) => crate::logger::log_error(&format!("Invalid Cache-Control value: {e}")),
        }
        for (name, value) in &self.extra_headers {
            headers.insert(name.clone(), value.clone());
        }
    }
}

/// Classify a request path; first matching rule wins
pub fn classify(path: &str) -> CacheDirective {
    if path == SERVICE_WORKER_PATH {
        let mut directive = CacheDirective::new(CachePolicy::NoStore);
        directive
            .extra_headers
            .insert(SERVICE_WORKER_ALLOWED.clone(), HeaderValue::from_static("/"));
        return directive;
    }

    if ENTRY_POINTS.contains(&path) {
        return CacheDirective::new(CachePolicy::NoCache);
    }

    CacheDirective::new(CachePolicy::default())
}
