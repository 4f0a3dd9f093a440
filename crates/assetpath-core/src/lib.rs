//! assetpath Core - Foundational types for the asset resolver
//!
//! This crate provides the types that the other assetpath crates depend on:
//! - `AssetIdentifier` - Parsed `asset:<name>[?v=<label>]` identifiers
//! - `VersionLabel` - Opaque version tags and their directory names
//! - Error types and Result alias

mod error;
mod id;

pub use error::{AssetPathError, ParseError, Result};
pub use id::{AssetIdentifier, VersionLabel, ASSET_SCHEME};
