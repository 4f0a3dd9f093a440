//! assetpath Resolver - Versioned asset store resolution
//!
//! This crate turns `asset:` identifiers into document paths inside a
//! version-numbered store, reading per-asset manifests to find the latest
//! version, with an optional thread-safe resolution cache.

mod cache;
mod canonical;
mod config;
mod layout;
mod manifest;
mod resolver;

pub use cache::{CacheStats, CachedManifests, ResolutionCache};
pub use canonical::{canonicalize, is_canonical};
pub use config::{CacheConfig, ResolverConfig, StoreConfig};
pub use layout::{normalize_path, Resolution, ResolvedPath, StoreLayout, DEFAULT_DOCUMENT_EXTENSION};
pub use manifest::{
    list_versions, manifest_path, read_latest, read_manifest, FsManifests, ManifestSource,
    VersionManifest, MANIFEST_FILE,
};
pub use resolver::{AssetResolver, StoreResolver};
