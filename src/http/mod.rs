//! HTTP protocol layer module
//!
//! The file-serving primitives: validators, conditional requests, byte
//! ranges, MIME detection and response builders. Nothing here knows which
//! asset is being served or which cache policy applies to it.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use cache::CachePolicy;
pub use range::{parse_range_header, ByteRange, RangeParseResult};
pub use response::{
    build_304_response, build_404_response, build_405_response, build_416_response,
    build_options_response, HttpResponse, Validators,
};
