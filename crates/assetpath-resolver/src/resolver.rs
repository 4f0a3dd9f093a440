//! The resolver contract and its store-backed implementation

use crate::cache::{CachedManifests, ResolutionCache};
use crate::canonical;
use crate::config::ResolverConfig;
use crate::layout::{Resolution, ResolvedPath, StoreLayout};
use crate::manifest::{self, FsManifests};
use assetpath_core::{AssetIdentifier, ParseError, Result, VersionLabel};
use log::debug;
use std::path::{Path, PathBuf};

/// What a host runtime needs from an asset resolution backend.
///
/// Implementations must be callable from many threads at once.
pub trait AssetResolver: Send + Sync {
    /// Parse a raw identifier string
    fn parse(&self, raw: &str) -> std::result::Result<AssetIdentifier, ParseError> {
        AssetIdentifier::parse(raw)
    }

    /// Resolve to an existing document path, or `None`
    fn resolve(&self, id: &AssetIdentifier) -> Option<ResolvedPath>;

    /// The string to persist in documents for `raw`
    fn canonicalize(&self, raw: &str) -> String {
        canonical::canonicalize(raw)
    }

    /// Parse then resolve. Only malformed syntax is an error.
    fn resolve_str(&self, raw: &str) -> std::result::Result<Option<ResolvedPath>, ParseError> {
        let id = self.parse(raw)?;
        Ok(self.resolve(&id))
    }
}

/// Resolver over a versioned directory store.
///
/// Constructed explicitly with its root. Without a root every identifier
/// resolves to nothing.
#[derive(Debug)]
pub struct StoreResolver {
    layout: Option<StoreLayout>,
    cache: Option<ResolutionCache>,
}

impl StoreResolver {
    /// Uncached resolver for the store at `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let layout = StoreLayout::new(root);
        debug!("StoreResolver::new() - asset root '{}'", layout.root().display());
        Self {
            layout: Some(layout),
            cache: None,
        }
    }

    /// Resolver with no store; every resolution yields `None`
    pub fn unconfigured() -> Self {
        debug!("StoreResolver::unconfigured()");
        Self {
            layout: None,
            cache: None,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        let resolver = match config.asset_root() {
            Some(root) => {
                let layout = StoreLayout::new(root).with_extension(&config.store.document_extension);
                debug!(
                    "StoreResolver::from_config() - asset root '{}', extension '{}'",
                    layout.root().display(),
                    layout.extension()
                );
                Self {
                    layout: Some(layout),
                    cache: None,
                }
            }
            None => Self::unconfigured(),
        };

        if config.cache.enabled {
            resolver.with_cache()
        } else {
            resolver
        }
    }

    /// Enable the resolution cache
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(ResolutionCache::new());
        self
    }

    pub fn layout(&self) -> Option<&StoreLayout> {
        self.layout.as_ref()
    }

    pub fn cache(&self) -> Option<&ResolutionCache> {
        self.cache.as_ref()
    }

    /// Resolve and explain the outcome
    pub fn diagnose(&self, id: &AssetIdentifier) -> Resolution {
        debug!("StoreResolver::diagnose('{}')", id);
        let Some(layout) = &self.layout else {
            return Resolution::Unconfigured;
        };
        let Some(cache) = &self.cache else {
            return layout.diagnose(id, &FsManifests::new(layout.root()));
        };

        if let Some(path) = cache.path(layout.root(), id) {
            return Resolution::Resolved(path);
        }

        let manifests = CachedManifests::new(cache, layout.root(), FsManifests::new(layout.root()));
        let resolution = layout.diagnose(id, &manifests);
        if let Resolution::Resolved(path) = &resolution {
            cache.insert_path(layout.root(), id, path.clone());
        }
        resolution
    }

    /// Where the document for `id` would live, without an existence check
    pub fn candidate_path(&self, id: &AssetIdentifier) -> Option<PathBuf> {
        let layout = self.layout.as_ref()?;
        match &self.cache {
            Some(cache) => layout.candidate_path(
                id,
                &CachedManifests::new(cache, layout.root(), FsManifests::new(layout.root())),
            ),
            None => layout.candidate_path(id, &FsManifests::new(layout.root())),
        }
    }

    /// The manifest's latest label for an asset, bypassing the cache
    pub fn latest_version(&self, name: &str) -> Result<Option<VersionLabel>> {
        match &self.layout {
            Some(layout) => manifest::read_latest(layout.root(), name),
            None => Ok(None),
        }
    }

    /// Published versions of an asset
    pub fn versions(&self, name: &str) -> Result<Vec<VersionLabel>> {
        match &self.layout {
            Some(layout) => manifest::list_versions(layout.root(), name),
            None => Ok(Vec::new()),
        }
    }

    /// Version-explicit identifier for a document path inside the store
    pub fn identifier_for_path(&self, path: &Path) -> Option<AssetIdentifier> {
        self.layout.as_ref()?.identifier_for_path(path)
    }

    /// Forget cached state for one asset, e.g. after it was republished
    pub fn invalidate(&self, name: &str) {
        if let Some(cache) = &self.cache {
            cache.invalidate(name);
        }
    }

    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}

impl AssetResolver for StoreResolver {
    fn resolve(&self, id: &AssetIdentifier) -> Option<ResolvedPath> {
        self.diagnose(id).into_resolved()
    }
}
