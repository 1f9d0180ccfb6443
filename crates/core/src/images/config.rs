//! Image store configuration types.

use std::path::{Path, PathBuf};

use imgstore_shared::{ScanMode, StorageSettings};

/// Image store configuration.
#[derive(Debug, Clone)]
pub struct ImageStoreConfig {
    /// Directory holding every stored image.
    pub root: PathBuf,
    /// Listing policy for malformed entries.
    pub scan_mode: ScanMode,
}

impl ImageStoreConfig {
    /// Name of the staging directory inside the root.
    pub const STAGING_DIR: &'static str = ".staging";

    /// Create a new store config with strict scanning.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scan_mode: ScanMode::Strict,
        }
    }

    /// Set the listing policy.
    #[must_use]
    pub fn with_scan_mode(mut self, scan_mode: ScanMode) -> Self {
        self.scan_mode = scan_mode;
        self
    }

    /// Directory where uploads are written before being moved into place.
    ///
    /// Lives under the root so the final rename stays on one filesystem.
    #[must_use]
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(Self::STAGING_DIR)
    }

    /// Storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl From<&StorageSettings> for ImageStoreConfig {
    fn from(settings: &StorageSettings) -> Self {
        Self::new(settings.root.clone()).with_scan_mode(settings.scan_mode)
    }
}
