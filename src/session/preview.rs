//! Scoped preview thumbnails for selected images.
//!
//! A [`Preview`] is the locally-displayable reference to a chosen photo: a
//! small PNG thumbnail written to a per-process temp path. Dropping the
//! preview removes the file, so replacing or resetting a selection never
//! leaks the resource.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Longest edge of a generated thumbnail, in pixels.
const THUMBNAIL_EDGE: u32 = 256;

static PREVIEW_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A thumbnail file that is deleted when the preview is dropped.
#[derive(Debug)]
pub struct Preview {
    path: PathBuf,
}

impl Preview {
    /// Generate a thumbnail for the given image bytes.
    ///
    /// Returns `None` when the bytes cannot be decoded or the thumbnail
    /// cannot be written. Selection itself does not validate the image, so a
    /// failed preview is not an error.
    pub fn generate(bytes: &[u8]) -> Option<Self> {
        let decoded = match image::load_from_memory(bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!("could not decode image for preview: {}", e);
                return None;
            }
        };

        let thumbnail = decoded.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE);
        let path = next_preview_path();
        if let Err(e) = thumbnail.save_with_format(&path, image::ImageFormat::Png) {
            log::warn!("could not write preview to {}: {}", path.display(), e);
            return None;
        }

        log::debug!("preview written to {}", path.display());
        Some(Self { path })
    }

    /// Path of the thumbnail file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::debug!("could not remove preview {}: {}", self.path.display(), e);
        }
    }
}

fn next_preview_path() -> PathBuf {
    let seq = PREVIEW_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "mycoscan_preview_{}_{}.png",
        std::process::id(),
        seq
    ))
}
