//! assetpath Schema - Asset metadata on scene documents
//!
//! This crate provides the `AssetInfoAPI` metadata schema (version, author,
//! status, description) and the minimal TOML stage document it is attached to.

mod asset_info;
mod stage;

pub use asset_info::{AssetInfo, AssetInfoApi, AssetInfoField, ASSET_INFO_API};
pub use stage::{PrimDef, Stage, StageFile, StageMetadata};
