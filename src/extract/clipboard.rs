//! Clipboard access backed by the `arboard` crate.
//!
//! [`SystemClipboard`] creates a short-lived [`arboard::Clipboard`] handle per
//! call rather than sharing one, because `arboard::Clipboard` is not `Send`
//! on all platforms and the handle is cheap to create.

use arboard::{Clipboard, ImageData};
use thiserror::Error;

use crate::extract::ImageHandle;

/// Kind prefix marking an image representation.
pub const IMAGE_KIND_PREFIX: &str = "image/";

/// Kind reported for images read through `arboard` (raw RGBA8 pixels).
pub const RGBA_IMAGE_KIND: &str = "image/rgba8";

// ---------------------------------------------------------------------------
// ClipboardError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// The clipboard could not be opened or read.
    #[error("Clipboard access denied or unavailable: {0}")]
    Access(String),

    /// The clipboard holds nothing image-shaped.
    #[error("No image found in clipboard")]
    NoImage,

    /// Writing text to the clipboard failed.
    #[error("Cannot copy to clipboard: {0}")]
    Write(String),
}

// ---------------------------------------------------------------------------
// ClipboardBackend
// ---------------------------------------------------------------------------

/// One representation of the clipboard contents.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardItem {
    /// MIME-style kind, e.g. `image/rgba8` or `text/plain`.
    pub kind: String,
    pub data: Vec<u8>,
    /// Pixel dimensions for image representations.
    pub dimensions: Option<(usize, usize)>,
}

/// System clipboard seam.  `Send + Sync` so writes can run on the blocking
/// thread pool behind an `Arc<dyn ClipboardBackend>`.
pub trait ClipboardBackend: Send + Sync {
    /// List the representations currently on the clipboard.
    fn read(&self) -> Result<Vec<ClipboardItem>, ClipboardError>;

    /// Replace the clipboard contents with `text`.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The OS clipboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardBackend for SystemClipboard {
    fn read(&self) -> Result<Vec<ClipboardItem>, ClipboardError> {
        let mut clipboard = open_clipboard()?;
        let image = clipboard.get_image();
        let text = clipboard.get_text();
        collect_items(image, text)
    }

    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = open_clipboard()?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Public helpers
// ---------------------------------------------------------------------------

/// Build an [`ImageHandle`] from the first image-kind representation on the
/// clipboard.
///
/// # Errors
///
/// [`ClipboardError::NoImage`] when no representation has an `image/` kind;
/// read failures are propagated as-is.
pub fn paste_image(backend: &dyn ClipboardBackend) -> Result<ImageHandle, ClipboardError> {
    let items = backend.read()?;
    let item = items
        .into_iter()
        .find(|item| item.kind.starts_with(IMAGE_KIND_PREFIX))
        .ok_or(ClipboardError::NoImage)?;

    let mut image = ImageHandle::from_bytes("pasted-image", item.kind, item.data);
    if let Some((w, h)) = item.dimensions {
        image = image.with_dimensions(w, h);
    }
    Ok(image)
}

/// Turn the `arboard` image and text reads into clipboard items.
///
/// Missing content is skipped.  A failed text read only matters when there
/// is no image: once an image is found, the text error is logged and dropped.
fn collect_items(
    image: Result<ImageData<'_>, arboard::Error>,
    text: Result<String, arboard::Error>,
) -> Result<Vec<ClipboardItem>, ClipboardError> {
    let mut items = Vec::new();

    match image {
        Ok(image) => items.push(ClipboardItem {
            kind: RGBA_IMAGE_KIND.into(),
            dimensions: Some((image.width, image.height)),
            data: image.bytes.into_owned(),
        }),
        Err(arboard::Error::ContentNotAvailable) => {}
        Err(e) => return Err(ClipboardError::Access(e.to_string())),
    }

    match text {
        Ok(text) => items.push(ClipboardItem {
            kind: "text/plain".into(),
            data: text.into_bytes(),
            dimensions: None,
        }),
        Err(arboard::Error::ContentNotAvailable) => {}
        Err(e) if !items.is_empty() => {
            log::warn!("clipboard: ignoring unreadable text next to an image: {e}");
        }
        Err(e) => return Err(ClipboardError::Access(e.to_string())),
    }

    Ok(items)
}

/// Open an `arboard::Clipboard` handle, mapping the error to [`ClipboardError`].
fn open_clipboard() -> Result<Clipboard, ClipboardError> {
    Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    fn rgba(width: usize, height: usize) -> ImageData<'static> {
        ImageData {
            width,
            height,
            bytes: Cow::Owned(vec![0; width * height * 4]),
        }
    }

    #[test]
    fn unreadable_text_next_to_image_is_skipped() {
        let items = collect_items(Ok(rgba(2, 1)), Err(arboard::Error::ConversionFailure)).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, RGBA_IMAGE_KIND);
        assert_eq!(items[0].dimensions, Some((2, 1)));
    }

    #[test]
    fn unreadable_text_without_image_is_access_error() {
        let err = collect_items(
            Err(arboard::Error::ContentNotAvailable),
            Err(arboard::Error::ConversionFailure),
        )
        .unwrap_err();
        assert!(matches!(err, ClipboardError::Access(_)));
    }

    #[test]
    fn missing_content_is_not_an_error() {
        let items = collect_items(
            Err(arboard::Error::ContentNotAvailable),
            Err(arboard::Error::ContentNotAvailable),
        )
        .unwrap();
        assert!(items.is_empty());

        let items = collect_items(Err(arboard::Error::ContentNotAvailable), Ok("hi".into())).unwrap();
        assert_eq!(items[0].kind, "text/plain");
    }

    struct StaticClipboard(Result<Vec<ClipboardItem>, ClipboardError>);

    impl ClipboardBackend for StaticClipboard {
        fn read(&self) -> Result<Vec<ClipboardItem>, ClipboardError> {
            self.0.clone()
        }

        fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
            Ok(())
        }
    }

    fn item(kind: &str, data: &[u8]) -> ClipboardItem {
        ClipboardItem {
            kind: kind.into(),
            data: data.to_vec(),
            dimensions: None,
        }
    }

    #[test]
    fn picks_first_image_representation() {
        let clipboard = StaticClipboard(Ok(vec![
            item("text/plain", b"hello"),
            item("image/png", &[1, 2]),
            item("image/jpeg", &[3, 4]),
        ]));

        let image = paste_image(&clipboard).unwrap();
        assert_eq!(image.mime(), "image/png");
        assert_eq!(image.bytes(), &[1, 2]);
    }

    #[test]
    fn carries_dimensions() {
        let clipboard = StaticClipboard(Ok(vec![ClipboardItem {
            kind: RGBA_IMAGE_KIND.into(),
            data: vec![0; 16],
            dimensions: Some((2, 2)),
        }]));

        let image = paste_image(&clipboard).unwrap();
        assert_eq!(image.dimensions(), Some((2, 2)));
    }

    #[test]
    fn text_only_clipboard_is_no_image() {
        let clipboard = StaticClipboard(Ok(vec![item("text/plain", b"hello")]));
        assert_eq!(paste_image(&clipboard), Err(ClipboardError::NoImage));
    }

    #[test]
    fn empty_clipboard_is_no_image() {
        let clipboard = StaticClipboard(Ok(Vec::new()));
        assert_eq!(paste_image(&clipboard), Err(ClipboardError::NoImage));
    }

    #[test]
    fn read_failure_is_propagated() {
        let clipboard = StaticClipboard(Err(ClipboardError::Access("denied".into())));
        assert_eq!(
            paste_image(&clipboard),
            Err(ClipboardError::Access("denied".into()))
        );
    }
}
