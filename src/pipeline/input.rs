//! Input resolution: a user-supplied path becomes image bytes plus a MIME
//! type the vision API will accept.
//!
//! The MIME type is sniffed from magic bytes rather than the file
//! extension — phone photos arrive as `.jpg`, `.jpeg`, `.JPG`, sometimes
//! renamed, and the vision API rejects a mismatched `mime_type`. Sniffing
//! also catches the "uploaded a PDF by accident" case early with a
//! meaningful error instead of an opaque model refusal.

use crate::error::MenuLensError;
use crate::session::MenuImage;
use std::path::Path;
use tracing::debug;

/// Read an image file and determine its MIME type from magic bytes.
pub fn resolve_image(path: impl AsRef<Path>) -> Result<MenuImage, MenuLensError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MenuLensError::ImageNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => MenuLensError::ImageNotFound {
            path: path.to_path_buf(),
        },
        _ => MenuLensError::ImageUnreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let mime_type = sniff_mime(&bytes).ok_or_else(|| MenuLensError::NotAnImage {
        path: path.to_path_buf(),
    })?;

    debug!(
        "Resolved image: {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        mime_type
    );

    Ok(MenuImage {
        bytes,
        mime_type: mime_type.to_string(),
    })
}

/// Sniff the MIME type of image bytes, or `None` for unrecognised data.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Minimal valid magic-byte prefixes; the sniffer only needs the header.
    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn sniffs_png_and_jpeg() {
        assert_eq!(sniff_mime(PNG_MAGIC), Some("image/png"));
        assert_eq!(sniff_mime(JPEG_MAGIC), Some("image/jpeg"));
    }

    #[test]
    fn rejects_non_image_bytes() {
        assert_eq!(sniff_mime(b"%PDF-1.7 not an image"), None);
        assert_eq!(sniff_mime(b""), None);
    }

    #[test]
    fn resolve_missing_file_is_image_not_found() {
        let result = resolve_image("/definitely/not/a/real/menu.jpg");
        assert!(matches!(result, Err(MenuLensError::ImageNotFound { .. })));
    }

    #[test]
    fn resolve_non_image_file_is_not_an_image() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"just some text").unwrap();
        let result = resolve_image(f.path());
        assert!(matches!(result, Err(MenuLensError::NotAnImage { .. })));
    }

    #[test]
    fn resolve_png_file_succeeds() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(PNG_MAGIC).unwrap();
        f.write_all(&[0u8; 16]).unwrap();
        let image = resolve_image(f.path()).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert!(!image.bytes.is_empty());
    }
}
