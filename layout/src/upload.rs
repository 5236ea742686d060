//! Image upload: turn raw image bytes into a `data:` URI that can be stored
//! directly in an image element's `url`.
//!
//! The format is detected from the bytes themselves, not from a file name.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::consts::MAX_IMAGE_BYTES;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("image is empty")]
    Empty,
    #[error("image is {size} bytes; the limit is {max}")]
    TooLarge { size: usize, max: usize },
    #[error("not a supported image format (png, jpeg, gif, webp, svg)")]
    UnsupportedType,
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Detect the MIME type of an image from its leading bytes.
#[must_use]
pub fn sniff_image_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some("image/png");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if looks_like_svg(bytes) {
        return Some("image/svg+xml");
    }
    None
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    // The cut may land inside a multi-byte character.
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        Err(e) => match std::str::from_utf8(&head[..e.valid_up_to()]) {
            Ok(text) => text,
            Err(_) => return false,
        },
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Encode `bytes` as a `data:` URI, enforcing the default size limit.
///
/// # Errors
///
/// [`UploadError::Empty`], [`UploadError::TooLarge`] or
/// [`UploadError::UnsupportedType`].
pub fn image_data_uri(bytes: &[u8]) -> Result<String, UploadError> {
    image_data_uri_with_limit(bytes, MAX_IMAGE_BYTES)
}

/// As [`image_data_uri`] with an explicit byte limit.
///
/// # Errors
///
/// See [`image_data_uri`].
pub fn image_data_uri_with_limit(bytes: &[u8], max: usize) -> Result<String, UploadError> {
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if bytes.len() > max {
        return Err(UploadError::TooLarge { size: bytes.len(), max });
    }
    let mime = sniff_image_type(bytes).ok_or(UploadError::UnsupportedType)?;
    debug!(mime, size = bytes.len(), "image encoded");
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Read an image file and encode it as a `data:` URI.
///
/// The file size is checked before the contents are read.
///
/// # Errors
///
/// [`UploadError::Io`] if the file cannot be read, otherwise as
/// [`image_data_uri`].
pub async fn read_image_file(path: impl AsRef<Path>) -> Result<String, UploadError> {
    let path = path.as_ref();
    let size = tokio::fs::metadata(path).await?.len();
    let size = usize::try_from(size).unwrap_or(usize::MAX);
    if size > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge { size, max: MAX_IMAGE_BYTES });
    }
    let bytes = tokio::fs::read(path).await?;
    image_data_uri(&bytes)
}
