//! Streaming multipart/form-data parsing
//!
//! Covers the subset of MIME multipart needed for file-upload forms:
//! boundary-delimited parts with `Content-Disposition` headers. Parts
//! are surfaced one at a time over the raw body stream; a part's body
//! is readable exactly once and only until the next part is requested.

pub mod boundary;
pub mod disposition;
pub mod error;
pub mod reader;

pub use boundary::extract_boundary;
pub use disposition::ContentDisposition;
pub use error::MultipartError;
pub use reader::{Part, PartReader};
