//! Layered resolver configuration
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `USD_ASSET_ROOT`, `ASSETPATH_DOCUMENT_EXTENSION`
//! 2. Project-local: `.assetpath/config.toml`
//! 3. Global: `~/.assetpath/config.toml`

use crate::layout::DEFAULT_DOCUMENT_EXTENSION;
use assetpath_core::{AssetPathError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Location and naming of the asset store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub asset_root: Option<PathBuf>,
    #[serde(default = "default_document_extension")]
    pub document_extension: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            asset_root: None,
            document_extension: default_document_extension(),
        }
    }
}

fn default_document_extension() -> String {
    DEFAULT_DOCUMENT_EXTENSION.to_string()
}

/// Resolution cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

/// `[store]` table as written in a config file. Unset keys leave the
/// lower layer's value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFileConfig {
    #[serde(default)]
    pub asset_root: Option<PathBuf>,
    #[serde(default)]
    pub document_extension: Option<String>,
}

/// `[cache]` table as written in a config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheFileConfig {
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfigFile {
    #[serde(default)]
    pub store: StoreFileConfig,
    #[serde(default)]
    pub cache: CacheFileConfig,
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverConfig {
    pub store: StoreConfig,
    pub cache: CacheConfig,
}

impl ResolverConfig {
    /// Environment variable naming the store root
    pub const ASSET_ROOT_ENV: &'static str = "USD_ASSET_ROOT";
    /// Environment variable overriding the document extension
    pub const DOCUMENT_EXTENSION_ENV: &'static str = "ASSETPATH_DOCUMENT_EXTENSION";

    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Layer 1: Global config (~/.assetpath/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 2: Project-local config (.assetpath/config.toml)
        let local_path = PathBuf::from(".assetpath/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            config.merge(local);
        }

        // Layer 3: Environment variable overrides
        config.apply_env_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Load config from a specific file path only (plus env overrides)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config: Self = Self::load_file(path)?.into();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Config for an explicit root with every other setting at its default
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            store: StoreConfig {
                asset_root: Some(root.into()),
                ..StoreConfig::default()
            },
            cache: CacheConfig::default(),
        }
    }

    pub fn asset_root(&self) -> Option<&Path> {
        self.store.asset_root.as_deref()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".assetpath").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<ResolverConfigFile> {
        let content = std::fs::read_to_string(path)?;
        let config: ResolverConfigFile = toml::from_str(&content).map_err(|e| {
            AssetPathError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    /// Overlay every key the file sets, including ones set back to their default
    fn merge(&mut self, overlay: ResolverConfigFile) {
        if let Some(root) = overlay.store.asset_root {
            self.store.asset_root = Some(root);
        }
        if let Some(ext) = overlay.store.document_extension {
            self.store.document_extension = ext;
        }
        if let Some(enabled) = overlay.cache.enabled {
            self.cache.enabled = enabled;
        }
    }

    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(Self::ASSET_ROOT_ENV).filter(|r| !r.is_empty()) {
            self.store.asset_root = Some(PathBuf::from(root));
        }
        if let Some(ext) = lookup(Self::DOCUMENT_EXTENSION_ENV).filter(|e| !e.is_empty()) {
            self.store.document_extension = ext;
        }
    }
}

impl From<ResolverConfigFile> for ResolverConfig {
    fn from(file: ResolverConfigFile) -> Self {
        let mut config = Self::default();
        config.merge(file);
        config
    }
}
