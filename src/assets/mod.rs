//! Asset store
//!
//! Read-only mapping from bundle-relative path to file content and metadata.
//! The store is filled once at startup, from the bundle compiled into the
//! binary, and never changes afterwards.

mod bundle;
mod path;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use hyper::body::Bytes;

use crate::error::{Error, Result};
use crate::http::{cache, mime};

pub use path::{decode, normalize};

/// Document served for directory requests
pub const INDEX_FILE: &str = "index.html";

/// One bundled file
#[derive(Debug, Clone)]
pub struct Asset {
    path: String,
    data: Bytes,
    content_type: &'static str,
    etag: String,
    last_modified: Option<DateTime<Utc>>,
    last_modified_header: Option<String>,
}

impl Asset {
    /// Create an asset; the content type and `ETag` are derived here
    pub fn new(
        path: impl Into<String>,
        data: impl Into<Bytes>,
        last_modified: Option<DateTime<Utc>>,
    ) -> Self {
        let path = path.into();
        let data = data.into();
        Self {
            content_type: mime::content_type_for_path(&path),
            etag: cache::generate_etag(&data),
            last_modified_header: last_modified.map(cache::format_http_date),
            last_modified,
            data,
            path,
        }
    }

    /// Bundle-relative path, e.g. `assets/app.js`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// File content; cloning is cheap
    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub const fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn etag(&self) -> &str {
        &self.etag
    }

    pub const fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    /// `Last-Modified` header value, pre-formatted
    pub fn last_modified_header(&self) -> Option<&str> {
        self.last_modified_header.as_deref()
    }
}

/// Immutable set of assets keyed by bundle-relative path
#[derive(Debug, Default)]
pub struct AssetStore {
    assets: HashMap<String, Asset>,
}

impl AssetStore {
    /// Load the bundle compiled into the binary and check it is servable
    pub fn embedded() -> Result<Self> {
        let store = Self::from_entries(bundle::load());
        store.verify()?;
        Ok(store)
    }

    /// Build a store from explicit assets; later duplicates replace earlier ones
    pub fn from_entries(entries: impl IntoIterator<Item = Asset>) -> Self {
        let assets = entries
            .into_iter()
            .map(|asset| (asset.path.clone(), asset))
            .collect();
        Self { assets }
    }

    /// Fail unless the store can serve the application's root document
    pub fn verify(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::Bundle("bundle contains no files".to_string()));
        }
        if !self.assets.contains_key(INDEX_FILE) {
            return Err(Error::Bundle(format!("bundle has no root {INDEX_FILE}")));
        }
        Ok(())
    }

    /// Resolve a request path (as sent, percent-encoded) to an asset
    ///
    /// Directory paths resolve to their `index.html`. `None` means not found.
    pub fn resolve(&self, request_path: &str) -> Option<&Asset> {
        let key = normalize(request_path)?;
        self.get(&key)
    }

    /// Look up an already-normalized bundle path
    pub fn get(&self, key: &str) -> Option<&Asset> {
        self.assets.get(key)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Bundle paths in sorted order
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.assets.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Total size of all asset bodies in bytes
    pub fn total_bytes(&self) -> usize {
        self.assets.values().map(Asset::size).sum()
    }
}
