//! Image store implementation backed by a flat directory.
//!
//! The directory listing is the index: each record is a single file named
//! `<uuid>.<ext>` directly under the root. Uploads are staged in
//! `<root>/.staging` and renamed into place only once fully written.

use std::fs;
use std::io::{self, Cursor, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use imgstore_shared::{ImageId, ScanMode};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use super::codec;
use super::config::ImageStoreConfig;
use super::error::ImageError;
use super::format::{ImageKind, SNIFF_LEN, detect_content_type};

/// Characters that can never appear in an identifier prefix.
const FORBIDDEN_QUERY_CHARS: [char; 6] = ['/', '\\', '*', '?', '[', ']'];

/// Filesystem image store.
///
/// Cheap to clone; clones share configuration and hold no other state, so
/// concurrent operations coordinate only through the filesystem.
#[derive(Debug, Clone)]
pub struct ImageStore {
    config: Arc<ImageStoreConfig>,
}

impl ImageStore {
    /// Open a store, creating the root and staging directories if needed.
    ///
    /// Staged files left behind by an interrupted process are removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageWrite` if the directories cannot be created.
    pub fn open(config: ImageStoreConfig) -> Result<Self, ImageError> {
        let staging = config.staging_dir();
        fs::create_dir_all(&staging).map_err(ImageError::StorageWrite)?;

        let store = Self {
            config: Arc::new(config),
        };
        store.purge_staging();

        info!(
            root = %store.config.root.display(),
            scan_mode = ?store.config.scan_mode,
            "Image store ready"
        );
        Ok(store)
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &ImageStoreConfig {
        &self.config
    }

    /// Store uploaded content under a fresh identifier.
    ///
    /// `declared_filename` is recorded in logs only; the stored type comes
    /// from sniffing the content.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` unless the content sniffs as JPEG or PNG,
    /// `StorageWrite` if the record cannot be written.
    pub async fn upload(
        &self,
        content: Bytes,
        declared_filename: &str,
    ) -> Result<ImageId, ImageError> {
        let store = self.clone();
        let declared_filename = declared_filename.to_owned();
        tokio::task::spawn_blocking(move || {
            store.store_reader(Cursor::new(content), &declared_filename)
        })
        .await?
    }

    /// Fetch the image whose identifier starts with `id`, scaled to `width`.
    ///
    /// A width of zero returns the image at its stored size.
    ///
    /// # Errors
    ///
    /// `InvalidId` when zero or several records match, or the decode and
    /// encode errors of [`codec::transcode`].
    pub async fn download(&self, id: &str, width: u32) -> Result<Vec<u8>, ImageError> {
        let store = self.clone();
        let id = id.to_owned();
        tokio::task::spawn_blocking(move || store.load(&id, width)).await?
    }

    /// List every stored identifier, sorted, spelled as on disk.
    ///
    /// # Errors
    ///
    /// In strict mode any file not named after an identifier fails the whole
    /// listing with `MalformedEntry`.
    pub async fn list_ids(&self) -> Result<Vec<String>, ImageError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.scan_ids()).await?
    }

    /// Blocking upload from any reader.
    ///
    /// The first [`SNIFF_LEN`] bytes decide the type; the whole stream,
    /// including those bytes, is then staged and moved to `<id>.<ext>`.
    /// On any failure the staged file is removed and nothing becomes visible.
    pub fn store_reader<R: Read>(
        &self,
        mut reader: R,
        declared_filename: &str,
    ) -> Result<ImageId, ImageError> {
        let mut head = Vec::with_capacity(SNIFF_LEN);
        (&mut reader)
            .take(SNIFF_LEN as u64)
            .read_to_end(&mut head)
            .map_err(ImageError::StorageRead)?;

        let content_type = detect_content_type(&head);
        let Some(kind) = ImageKind::from_content_type(content_type) else {
            debug!(
                declared_filename,
                content_type, "Rejected upload with unsupported content"
            );
            return Err(ImageError::invalid_format(content_type));
        };

        let id = ImageId::new();
        let path = self.record_path(id, kind);

        let mut staged = self.staging_file().map_err(ImageError::StorageWrite)?;
        staged.write_all(&head).map_err(ImageError::StorageWrite)?;
        let rest = io::copy(&mut reader, &mut staged).map_err(ImageError::StorageWrite)?;
        staged.as_file().sync_all().map_err(ImageError::StorageWrite)?;
        staged
            .persist_noclobber(&path)
            .map_err(|e| ImageError::StorageWrite(e.error))?;

        info!(
            id = %id,
            kind = kind.extension(),
            size = head.len() as u64 + rest,
            declared_filename,
            "Stored image"
        );
        Ok(id)
    }

    /// Blocking download: resolve `query` as a prefix, then transcode.
    pub fn load(&self, query: &str, width: u32) -> Result<Vec<u8>, ImageError> {
        let path = self.resolve(query)?;
        let data = fs::read(&path).map_err(ImageError::StorageRead)?;
        codec::transcode(&data, width)
    }

    /// Finds the single record whose file name starts with `query`.
    ///
    /// The query is a literal prefix. Empty queries and queries carrying path
    /// separators or glob metacharacters never name a record. Not-found and
    /// ambiguous are reported alike as `InvalidId`.
    pub fn resolve(&self, query: &str) -> Result<PathBuf, ImageError> {
        if query.is_empty() || query.contains(FORBIDDEN_QUERY_CHARS) {
            debug!(query, "Rejected malformed image id");
            return Err(ImageError::invalid_id(query, 0));
        }

        let mut matches = Vec::new();
        for entry in self.entries() {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }
            if entry.file_name().to_string_lossy().starts_with(query) {
                matches.push(entry.into_path());
            }
        }

        debug!(query, matches = matches.len(), "Resolved image id");
        match matches.len() {
            1 => Ok(matches.remove(0)),
            n => Err(ImageError::invalid_id(query, n)),
        }
    }

    /// Blocking listing of stored identifiers.
    ///
    /// Each name segment before the first `.` must parse as an identifier and
    /// is returned verbatim, so every listed id resolves on download.
    pub fn scan_ids(&self) -> Result<Vec<String>, ImageError> {
        let mut ids = Vec::new();
        for entry in self.entries() {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            let candidate = name.split('.').next().unwrap_or_default();
            match candidate.parse::<ImageId>() {
                Ok(_) => ids.push(candidate.to_owned()),
                Err(source) => match self.config.scan_mode {
                    ScanMode::Strict => {
                        return Err(ImageError::MalformedEntry {
                            name: name.into_owned(),
                            source,
                        });
                    }
                    ScanMode::Lenient => {
                        warn!(entry = %name, error = %source, "Skipping malformed storage entry");
                    }
                },
            }
        }

        ids.sort();
        Ok(ids)
    }

    fn record_path(&self, id: ImageId, kind: ImageKind) -> PathBuf {
        self.config.root.join(format!("{id}.{}", kind.extension()))
    }

    /// Staged upload file. On Unix it is created with mode `0o666`, so the
    /// process umask decides the final record permissions.
    fn staging_file(&self) -> io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        builder.tempfile_in(self.config.staging_dir())
    }

    /// Direct children of the root, staging directory included.
    fn entries(&self) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
        WalkDir::new(&self.config.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
    }

    fn purge_staging(&self) {
        let Ok(entries) = fs::read_dir(self.config.staging_dir()) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if let Err(e) = fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "Failed to remove stale staged upload");
            } else {
                warn!(path = %path.display(), "Removed stale staged upload");
            }
        }
    }
}
