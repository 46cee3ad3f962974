//! Multipart parsing errors

use thiserror::Error;

/// Errors raised while parsing a multipart request
///
/// Every variant is a client-input fault; none of them is recoverable
/// for the current request.
#[derive(Error, Debug)]
pub enum MultipartError {
    /// The request's content type is absent, unparseable, or not
    /// `multipart/*`
    #[error("expected a multipart request, got {}", .0.as_deref().unwrap_or("no content type"))]
    NotMultipart(Option<String>),

    /// The multipart content type carries no boundary parameter
    #[error("multipart content type is missing a boundary parameter")]
    MissingBoundary,

    /// The boundary token exceeds the configured maximum
    #[error("multipart boundary of {len} characters exceeds the limit of {max}")]
    BoundaryTooLong { len: usize, max: usize },

    /// A part's header section exceeds the configured maximum
    #[error("part header section exceeds the limit of {max} bytes")]
    HeaderTooLarge { max: usize },

    /// The body ended before the closing boundary marker
    #[error("multipart body ended before the closing boundary")]
    Truncated,

    /// Reading the underlying body stream failed
    #[error("error reading request body: {0}")]
    Body(#[source] std::io::Error),
}
