//! Thread-safe memoization of manifest reads and resolved paths

use crate::layout::ResolvedPath;
use crate::manifest::{ManifestSource, VersionManifest};
use assetpath_core::{AssetIdentifier, Result};
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Counters describing cache effectiveness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub manifests: usize,
    pub paths: usize,
}

/// Cache of manifests keyed by `(asset_root, name)` and resolved paths keyed
/// by `(asset_root, identifier)`.
///
/// Entries are inserted whole under a write lock, so readers never see a
/// partial entry. Concurrent misses on the same key may both do the lookup;
/// lookups are idempotent so the last insert wins harmlessly. Resolved paths
/// are re-checked against the filesystem on every hit.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    manifests: RwLock<HashMap<(PathBuf, String), VersionManifest>>,
    paths: RwLock<HashMap<(PathBuf, AssetIdentifier), ResolvedPath>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached manifest for an asset, if any
    pub fn manifest(&self, root: &Path, name: &str) -> Option<VersionManifest> {
        let manifests = self.manifests.read().unwrap_or_else(PoisonError::into_inner);
        let found = manifests
            .get(&(root.to_path_buf(), name.to_string()))
            .cloned();
        self.record(found.is_some());
        found
    }

    pub fn insert_manifest(&self, root: &Path, name: &str, manifest: VersionManifest) {
        self.manifests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((root.to_path_buf(), name.to_string()), manifest);
    }

    /// Cached resolution for an identifier whose document still exists.
    /// Entries whose document has disappeared are evicted.
    pub fn path(&self, root: &Path, id: &AssetIdentifier) -> Option<ResolvedPath> {
        let key = (root.to_path_buf(), id.clone());
        let cached = self
            .paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();

        match cached {
            Some(path) if path.as_path().is_file() => {
                self.record(true);
                Some(path)
            }
            Some(path) => {
                debug!("ResolutionCache - evicting stale '{}' -> '{}'", id, path);
                self.paths
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&key);
                self.record(false);
                None
            }
            None => {
                self.record(false);
                None
            }
        }
    }

    pub fn insert_path(&self, root: &Path, id: &AssetIdentifier, path: ResolvedPath) {
        self.paths
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((root.to_path_buf(), id.clone()), path);
    }

    /// Drop everything cached for one asset name, under any root
    pub fn invalidate(&self, name: &str) {
        debug!("ResolutionCache::invalidate('{}')", name);
        self.manifests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(_, cached), _| cached != name);
        self.paths
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(_, id), _| id.name() != name);
    }

    pub fn invalidate_all(&self) {
        debug!("ResolutionCache::invalidate_all()");
        self.manifests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.paths
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            manifests: self
                .manifests
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .len(),
            paths: self.paths.read().unwrap_or_else(PoisonError::into_inner).len(),
        }
    }

    fn record(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Manifest source that consults the cache before an inner source.
///
/// Only manifests that were actually found are cached; a missing or corrupt
/// manifest is read again next time.
pub struct CachedManifests<'a, S> {
    cache: &'a ResolutionCache,
    root: &'a Path,
    inner: S,
}

impl<'a, S: ManifestSource> CachedManifests<'a, S> {
    pub fn new(cache: &'a ResolutionCache, root: &'a Path, inner: S) -> Self {
        Self { cache, root, inner }
    }
}

impl<S: ManifestSource> ManifestSource for CachedManifests<'_, S> {
    fn read_manifest(&self, name: &str) -> Result<Option<VersionManifest>> {
        if let Some(manifest) = self.cache.manifest(self.root, name) {
            return Ok(Some(manifest));
        }

        let manifest = self.inner.read_manifest(name)?;
        if let Some(found) = &manifest {
            self.cache.insert_manifest(self.root, name, found.clone());
        }
        Ok(manifest)
    }
}
