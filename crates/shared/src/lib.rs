//! Shared types, errors, and configuration for imgstore.
//!
//! This crate provides common types used across all other crates:
//! - Typed image identifiers
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ScanMode, ServerConfig, StorageSettings};
pub use error::{AppError, AppResult};
pub use types::ImageId;
