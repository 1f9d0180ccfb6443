//! Image store: durable persistence and on-demand resizing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          ImageStore                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ upload(bytes, name)   │ sniff → stage → rename to <id>.<ext>    │
//! │ download(id, width)   │ prefix lookup → decode → resize → encode│
//! │ list_ids()            │ directory scan → parse <id> prefixes    │
//! └─────────────────────────────────────────────────────────────────┘
//!          │                                  │
//!     format (sniffing)                 codec (Lanczos3)
//! ```

pub mod codec;
mod config;
mod error;
pub mod format;
mod service;

#[cfg(test)]
mod fixtures;

pub use config::ImageStoreConfig;
pub use error::ImageError;
pub use codec::parse_width;
pub use format::{ImageKind, detect_content_type};
pub use service::ImageStore;
