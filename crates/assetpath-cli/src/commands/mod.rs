//! CLI command implementations

pub mod info;
pub mod resolve;
pub mod versions;

use anyhow::{Context, Result};
use assetpath_resolver::{ResolverConfig, StoreResolver};
use std::path::PathBuf;

/// Store selection shared by every command
pub struct StoreArgs {
    pub root: Option<String>,
    pub no_cache: bool,
}

impl StoreArgs {
    /// Build a resolver from layered config with command-line overrides
    pub fn resolver(&self) -> Result<StoreResolver> {
        let mut config = ResolverConfig::load().context("Failed to load resolver config")?;
        if let Some(root) = &self.root {
            config.store.asset_root = Some(PathBuf::from(root));
        }
        if self.no_cache {
            config.cache.enabled = false;
        }

        if config.asset_root().is_none() {
            log::warn!(
                "No asset root configured; set {} or pass --root",
                ResolverConfig::ASSET_ROOT_ENV
            );
        }

        Ok(StoreResolver::from_config(&config))
    }
}
