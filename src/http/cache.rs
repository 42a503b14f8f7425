//! HTTP cache control module
//!
//! Provides `ETag` generation, HTTP-date handling, conditional request
//! evaluation and the `Cache-Control` policies the server emits.

use chrono::{DateTime, Utc};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate `ETag` using fast hashing
///
/// # Arguments
/// * `content` - File content
///
/// # Returns
/// Quoted `ETag` string, e.g., `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Weak validators: `W/"abc123"` (weak comparison)
/// - Wildcard: `*`
///
/// # Returns
/// Returns true if matched (should return 304), false otherwise
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').map(str::trim).any(|e| {
            e == "*" || e.strip_prefix("W/").unwrap_or(e) == etag
        })
    })
}

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an HTTP date header value
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Check `If-Modified-Since` against the resource's modification time
///
/// Returns true when the resource has not changed since the client's copy.
/// Comparison is at whole-second precision, as HTTP dates are.
pub fn not_modified_since(
    if_modified_since: Option<&str>,
    last_modified: Option<DateTime<Utc>>,
) -> bool {
    match (if_modified_since.and_then(parse_http_date), last_modified) {
        (Some(since), Some(modified)) => modified.timestamp() <= since.timestamp(),
        _ => false,
    }
}

/// Decide whether a conditional GET can be answered with 304
///
/// `If-None-Match` takes precedence; `If-Modified-Since` is only consulted
/// when the client sent no entity tags.
pub fn is_not_modified(
    if_none_match: Option<&str>,
    if_modified_since: Option<&str>,
    etag: &str,
    last_modified: Option<DateTime<Utc>>,
) -> bool {
    if if_none_match.is_some() {
        return check_etag_match(if_none_match, etag);
    }
    not_modified_since(if_modified_since, last_modified)
}

/// Evaluate `If-Range`: true when a `Range` header should be honoured
///
/// An entity tag must match strongly; a date must equal the modification
/// time exactly. Anything else falls back to the full representation.
pub fn if_range_matches(
    if_range: Option<&str>,
    etag: &str,
    last_modified: Option<DateTime<Utc>>,
) -> bool {
    let Some(value) = if_range.map(str::trim) else {
        return true;
    };

    if value.starts_with('"') {
        return value == etag;
    }
    if value.starts_with("W/") {
        return false;
    }

    match (parse_http_date(value), last_modified) {
        (Some(date), Some(modified)) => date.timestamp() == modified.timestamp(),
        _ => false,
    }
}

/// One year, the conventional ceiling for `max-age`
pub const ONE_YEAR_SECS: u32 = 31_536_000;

/// Cache control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Never store the response
    NoStore,
    /// Store, but revalidate with the origin before every use
    NoCache,
    /// Public cache for the given max-age (seconds), never revalidated
    Immutable(u32),
}

impl CachePolicy {
    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::NoStore => "no-store".to_string(),
            Self::NoCache => "no-cache".to_string(),
            Self::Immutable(max_age) => format!("public, max-age={max_age}, immutable"),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::Immutable(ONE_YEAR_SECS)
    }
}
