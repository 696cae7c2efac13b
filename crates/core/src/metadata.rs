use anyhow::Result;
use std::path::Path;

/// Property name for a still image's capture time.
pub const DATE_TAKEN: &str = "DateTimeOriginal";

/// Named metadata lookup on a still image. `None` means the file carries no
/// such property or could not be read; neither is an error.
pub trait PropertyProvider {
    fn property(&self, path: &Path, name: &str) -> Option<String>;
}

/// Reads the raw "encoded date" string of a video container.
pub trait VideoMetadataProvider {
    fn encoded_date(&self, path: &Path) -> Result<String>;
}

impl<T: PropertyProvider + ?Sized> PropertyProvider for &T {
    fn property(&self, path: &Path, name: &str) -> Option<String> {
        (**self).property(path, name)
    }
}

impl<T: VideoMetadataProvider + ?Sized> VideoMetadataProvider for &T {
    fn encoded_date(&self, path: &Path) -> Result<String> {
        (**self).encoded_date(path)
    }
}
