//! Image store error types.

use std::io;

use imgstore_shared::AppError;
use thiserror::Error;

/// Image store operation errors.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Content is not a supported image type.
    #[error("unsupported image format: {content_type}")]
    InvalidFormat {
        /// Sniffed or decoded content type.
        content_type: String,
    },

    /// Lookup matched zero or several stored images.
    #[error("invalid image id '{query}': {matches} matching files")]
    InvalidId {
        /// Identifier or prefix that was looked up.
        query: String,
        /// Number of stored files that matched.
        matches: usize,
    },

    /// Requested width is not a non-negative integer.
    #[error("invalid width '{0}'")]
    InvalidWidth(String),

    /// Writing a new record failed.
    #[error("failed to write image: {0}")]
    StorageWrite(#[source] io::Error),

    /// Reading the storage root or a record failed.
    #[error("failed to read image storage: {0}")]
    StorageRead(#[source] io::Error),

    /// A stored file could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// Re-encoding the (resized) image failed.
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// A file in the storage root is not named after an identifier.
    #[error("malformed entry '{name}' in storage root: {source}")]
    MalformedEntry {
        /// Offending file name.
        name: String,
        /// Why its prefix is not an identifier.
        #[source]
        source: uuid::Error,
    },

    /// Blocking worker panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(String),
}

impl ImageError {
    /// Create an invalid format error.
    #[must_use]
    pub fn invalid_format(content_type: impl Into<String>) -> Self {
        Self::InvalidFormat {
            content_type: content_type.into(),
        }
    }

    /// Create an invalid id error.
    #[must_use]
    pub fn invalid_id(query: impl Into<String>, matches: usize) -> Self {
        Self::InvalidId {
            query: query.into(),
            matches,
        }
    }
}

impl From<walkdir::Error> for ImageError {
    fn from(err: walkdir::Error) -> Self {
        Self::StorageRead(err.into())
    }
}

impl From<tokio::task::JoinError> for ImageError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

impl From<ImageError> for AppError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::InvalidFormat { .. } | ImageError::InvalidWidth(_) => {
                Self::Validation(err.to_string())
            }
            ImageError::InvalidId { .. } => Self::NotFound(err.to_string()),
            ImageError::StorageWrite(_)
            | ImageError::StorageRead(_)
            | ImageError::Decode(_)
            | ImageError::Encode(_)
            | ImageError::MalformedEntry { .. } => Self::Storage(err.to_string()),
            ImageError::Task(_) => Self::Internal(err.to_string()),
        }
    }
}
