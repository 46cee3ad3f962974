//! Boundary extraction from the Content-Type header

use super::MultipartError;

/// Extract and validate the multipart boundary token from a request's
/// `Content-Type` header. Pure parse, no side effects.
///
/// Fails with [`MultipartError::NotMultipart`] when the header is
/// missing, unparseable, or not a `multipart/*` media type, with
/// [`MultipartError::MissingBoundary`] when the boundary parameter is
/// absent or empty, and with [`MultipartError::BoundaryTooLong`] when
/// the token exceeds `max_len`.
pub fn extract_boundary(
    content_type: Option<&str>,
    max_len: usize,
) -> Result<String, MultipartError> {
    let raw = content_type
        .ok_or(MultipartError::NotMultipart(None))?;

    let media_type: mime::Mime = raw
        .parse()
        .map_err(|_| MultipartError::NotMultipart(Some(raw.to_string())))?;

    if media_type.type_() != mime::MULTIPART {
        return Err(MultipartError::NotMultipart(Some(raw.to_string())));
    }

    let boundary = media_type
        .get_param(mime::BOUNDARY)
        .map(|b| b.as_str())
        .filter(|b| !b.is_empty())
        .ok_or(MultipartError::MissingBoundary)?;

    if boundary.len() > max_len {
        return Err(MultipartError::BoundaryTooLong {
            len: boundary.len(),
            max: max_len,
        });
    }

    Ok(boundary.to_string())
}
