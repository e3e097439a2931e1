//! Cover images from local files, embedded as data URLs.

use crate::error::{NessbookError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::Path;

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Reads `path` and returns it as a `data:<mime>;base64,...` URL.
pub fn inline_image(path: &Path) -> Result<String> {
    let mime = mime_for(path).ok_or_else(|| {
        NessbookError::Validation(format!("{} is not a supported image", path.display()))
    })?;
    let bytes = fs::read(path).map_err(NessbookError::Io)?;
    Ok(data_url(mime, &bytes))
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub fn is_inline(image: &str) -> bool {
    image.starts_with("data:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_png_as_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.PNG");
        fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let url = inline_image(&path).unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw==");
        assert!(is_inline(&url));
    }

    #[test]
    fn rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();
        assert!(matches!(
            inline_image(&path),
            Err(NessbookError::Validation(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            inline_image(&dir.path().join("gone.jpg")),
            Err(NessbookError::Io(_))
        ));
    }
}
