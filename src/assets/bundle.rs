//! Build-time asset bundle
//!
//! The `app/` directory is compiled into the binary. Debug builds read it
//! from disk instead, so edits show up without recompiling.

use std::borrow::Cow;

use chrono::DateTime;
use hyper::body::Bytes;
use rust_embed::RustEmbed;

use super::Asset;

#[derive(RustEmbed)]
#[folder = "app/"]
struct Bundle;

/// Read every bundled file into an `Asset`
pub fn load() -> Vec<Asset> {
    Bundle::iter()
        .filter_map(|path| {
            let file = Bundle::get(&path)?;
            let last_modified = file
                .metadata
                .last_modified()
                .and_then(|secs| i64::try_from(secs).ok())
                .and_then(|secs| DateTime::from_timestamp(secs, 0));
            let data = match file.data {
                Cow::Borrowed(bytes) => Bytes::from_static(bytes),
                Cow::Owned(bytes) => Bytes::from(bytes),
            };
            Some(Asset::new(path.into_owned(), data, last_modified))
        })
        .collect()
}
