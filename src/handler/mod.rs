//! Request handler module
//!
//! Responsible for request dispatch: cache-policy classification, asset
//! lookup and file serving.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::route_request;
