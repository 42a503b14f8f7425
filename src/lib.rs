//! Static asset server for the FileKey single-page app.
//!
//! Serves a bundle compiled into the binary and sets `Cache-Control` per
//! path class: the service worker is never stored, entry points are always
//! revalidated, and everything else is cached for a year.

pub mod assets;
pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod policy;
pub mod server;

pub use error::{Error, Result};
