//! Per-asset version manifests (`versions.json`)

use assetpath_core::{AssetPathError, Result, VersionLabel};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the manifest inside each asset directory
pub const MANIFEST_FILE: &str = "versions.json";

/// Contents of `<asset_root>/<name>/versions.json`
///
/// The `name` field is informational only; the directory name is what the
/// store layout uses. `latest` may be written as the bare label (`"10"`) or
/// as its directory name (`"v10"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionManifest {
    #[serde(default)]
    pub name: String,
    #[serde(deserialize_with = "deserialize_latest")]
    pub latest: VersionLabel,
}

fn deserialize_latest<'de, D>(deserializer: D) -> std::result::Result<VersionLabel, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    VersionLabel::from_manifest(&text).ok_or_else(|| {
        serde::de::Error::custom(format!("'latest' is not a valid version label: {:?}", text))
    })
}

/// Anything that can answer "what is the manifest for this asset?"
pub trait ManifestSource {
    /// Read the manifest for `name`. `Ok(None)` means the asset has none.
    fn read_manifest(&self, name: &str) -> Result<Option<VersionManifest>>;

    /// The label the manifest currently calls latest
    fn latest_version(&self, name: &str) -> Result<Option<VersionLabel>> {
        Ok(self.read_manifest(name)?.map(|m| m.latest))
    }
}

impl<T: ManifestSource + ?Sized> ManifestSource for &T {
    fn read_manifest(&self, name: &str) -> Result<Option<VersionManifest>> {
        (**self).read_manifest(name)
    }
}

/// Manifest source backed directly by the store directory
#[derive(Debug, Clone, Copy)]
pub struct FsManifests<'a> {
    root: &'a Path,
}

impl<'a> FsManifests<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }
}

impl ManifestSource for FsManifests<'_> {
    fn read_manifest(&self, name: &str) -> Result<Option<VersionManifest>> {
        read_manifest(self.root, name)
    }
}

/// Path of the manifest for an asset
pub fn manifest_path(asset_root: &Path, name: &str) -> PathBuf {
    asset_root.join(name).join(MANIFEST_FILE)
}

/// Load and validate an asset's manifest
pub fn read_manifest(asset_root: &Path, name: &str) -> Result<Option<VersionManifest>> {
    let path = manifest_path(asset_root, name);

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("read_manifest - no manifest at '{}'", path.display());
            return Ok(None);
        }
        Err(e) => return Err(corrupt(&path, e.to_string())),
    };

    let manifest: VersionManifest =
        serde_json::from_str(&content).map_err(|e| corrupt(&path, e.to_string()))?;

    if !manifest.name.is_empty() && manifest.name != name {
        debug!(
            "read_manifest - manifest name '{}' differs from directory '{}'",
            manifest.name, name
        );
    }

    debug!("read_manifest('{}') -> latest '{}'", name, manifest.latest);
    Ok(Some(manifest))
}

/// The latest version label recorded for an asset
pub fn read_latest(asset_root: &Path, name: &str) -> Result<Option<VersionLabel>> {
    FsManifests::new(asset_root).latest_version(name)
}

/// List the published `v<label>` directories of an asset.
///
/// Decimal labels come first in numeric order, anything else follows sorted
/// by text. A missing asset directory yields an empty list.
pub fn list_versions(asset_root: &Path, name: &str) -> Result<Vec<VersionLabel>> {
    let dir = asset_root.join(name);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut versions = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(label) = entry.file_name().to_str().and_then(VersionLabel::from_dir_name) {
            versions.push(label);
        }
    }

    versions.sort_by(|a, b| match (a.numeric(), b.numeric()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.as_str().cmp(b.as_str()),
    });
    Ok(versions)
}

fn corrupt(path: &Path, reason: String) -> AssetPathError {
    AssetPathError::ManifestCorrupt {
        path: path.to_path_buf(),
        reason,
    }
}
