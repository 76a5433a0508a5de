//! Opaque image handles.
//!
//! Nothing decodes the pixels — the simulated OCR stage only needs something
//! to hold — so a handle is a name, a MIME kind and the raw bytes.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

/// File extensions accepted by the file picker, with their MIME kinds.
const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
];

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Not an image file: {0}")]
    Unsupported(String),

    #[error("Cannot read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Guess the MIME kind of `path` from its extension.  `None` for anything that
/// isn't a supported image.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// A selected or pasted image.  Cheap to clone.
#[derive(Clone, PartialEq)]
pub struct ImageHandle {
    name: String,
    mime: String,
    bytes: Arc<[u8]>,
    dimensions: Option<(usize, usize)>,
}

impl ImageHandle {
    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
            dimensions: None,
        }
    }

    /// Attach pixel dimensions (known for clipboard images).
    pub fn with_dimensions(mut self, width: usize, height: usize) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    /// Read an image file from disk.
    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let mime = mime_for_path(path)
            .ok_or_else(|| ImageError::Unsupported(path.display().to_string()))?;
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_bytes(name, mime, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.dimensions
    }
}

impl std::fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHandle")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn mime_from_extension_is_case_insensitive() {
        assert_eq!(mime_for_path(Path::new("a.PNG")), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("dir/b.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("c.webp")), Some("image/webp"));
    }

    #[test]
    fn non_image_extensions_are_rejected() {
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("no_extension")), None);
    }

    #[test]
    fn from_path_reads_bytes_and_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let image = ImageHandle::from_path(&path).unwrap();
        assert_eq!(image.name(), "scan.png");
        assert_eq!(image.mime(), "image/png");
        assert_eq!(image.bytes(), &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn from_path_rejects_non_images_before_reading() {
        let err = ImageHandle::from_path(Path::new("/does/not/exist.txt")).unwrap_err();
        assert!(matches!(err, ImageError::Unsupported(_)));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = ImageHandle::from_path(Path::new("/does/not/exist.png")).unwrap_err();
        assert!(matches!(err, ImageError::Io(_)));
    }

    #[test]
    fn debug_omits_bytes() {
        let image = ImageHandle::from_bytes("x.png", "image/png", vec![7; 1000]).with_dimensions(10, 25);
        let dbg = format!("{image:?}");
        assert!(dbg.contains("len: 1000"));
        assert!(dbg.contains("(10, 25)"));
    }
}
