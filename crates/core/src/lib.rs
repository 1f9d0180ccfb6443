//! Image storage engine for imgstore.
//!
//! This crate contains the storage and retrieval logic with ZERO web dependencies.
//!
//! # Modules
//!
//! - `images` - Upload, prefix lookup, listing, format sniffing, and resizing

pub mod images;
