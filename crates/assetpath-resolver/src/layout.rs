//! Directory layout of the versioned asset store
//!
//! Each asset lives at `<root>/<name>/` with a `versions.json` manifest and
//! one `v<label>/<name>.<ext>` document per published version.

use crate::manifest::{self, ManifestSource};
use assetpath_core::{AssetIdentifier, VersionLabel};
use log::{debug, warn};
use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// Extension of the scene documents stored per version
pub const DEFAULT_DOCUMENT_EXTENSION: &str = "usd";

/// An absolute, normalized path to an existing asset document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedPath(PathBuf);

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Last modification time of the document
    pub fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.0).and_then(|m| m.modified()).ok()
    }

    /// Open the document for reading
    pub fn open(&self) -> io::Result<File> {
        File::open(&self.0)
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Outcome of a resolution, including why nothing was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The document exists
    Resolved(ResolvedPath),
    /// No store root is configured
    Unconfigured,
    /// No explicit version and the asset has no manifest
    ManifestMissing,
    /// No explicit version and the manifest could not be read
    ManifestCorrupt(String),
    /// The requested version has no document
    VersionMissing {
        version: VersionLabel,
        candidate: PathBuf,
    },
    /// The manifest's latest version has no document
    DanglingLatest {
        latest: VersionLabel,
        candidate: PathBuf,
    },
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// Collapse to the resolver's value: a path or nothing
    pub fn into_resolved(self) -> Option<ResolvedPath> {
        match self {
            Resolution::Resolved(path) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Resolved(path) => write!(f, "{}", path),
            Resolution::Unconfigured => write!(f, "no asset root configured"),
            Resolution::ManifestMissing => write!(f, "asset has no versions.json"),
            Resolution::ManifestCorrupt(reason) => write!(f, "unreadable manifest: {}", reason),
            Resolution::VersionMissing { version, candidate } => write!(
                f,
                "version '{}' not found at {}",
                version,
                candidate.display()
            ),
            Resolution::DanglingLatest { latest, candidate } => write!(
                f,
                "manifest latest '{}' not found at {}",
                latest,
                candidate.display()
            ),
        }
    }
}

/// Path construction and lookup for a store rooted at one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    root: PathBuf,
    extension: String,
}

impl StoreLayout {
    /// Create a layout for the given root. Relative roots are made absolute
    /// against the current directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: normalize_path(root.as_ref()),
            extension: DEFAULT_DOCUMENT_EXTENSION.to_string(),
        }
    }

    /// Use a different document extension (with or without the leading dot)
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn asset_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn manifest_path(&self, name: &str) -> PathBuf {
        manifest::manifest_path(&self.root, name)
    }

    pub fn version_dir(&self, name: &str, version: &VersionLabel) -> PathBuf {
        self.asset_dir(name).join(version.dir_name())
    }

    /// `<root>/<name>/v<label>/<name>.<ext>`, whether or not it exists
    pub fn document_path(&self, name: &str, version: &VersionLabel) -> PathBuf {
        let file_name = format!("{}.{}", name, self.extension);
        normalize_path(&self.version_dir(name, version).join(file_name))
    }

    /// Where the identifier's document lives or would live, without checking
    /// that it exists. `None` when no version can be determined.
    pub fn candidate_path(
        &self,
        id: &AssetIdentifier,
        manifests: &dyn ManifestSource,
    ) -> Option<PathBuf> {
        let version = match id.version() {
            Some(version) => version.clone(),
            None => manifests.latest_version(id.name()).ok().flatten()?,
        };
        Some(self.document_path(id.name(), &version))
    }

    /// Resolve an identifier, reporting why it failed when it does
    pub fn diagnose(&self, id: &AssetIdentifier, manifests: &dyn ManifestSource) -> Resolution {
        let (version, from_manifest) = match id.version() {
            Some(version) => (version.clone(), false),
            None => match manifests.latest_version(id.name()) {
                Ok(Some(latest)) => (latest, true),
                Ok(None) => return Resolution::ManifestMissing,
                Err(e) => {
                    warn!("Cannot determine latest version of '{}': {}", id.name(), e);
                    return Resolution::ManifestCorrupt(e.to_string());
                }
            },
        };

        let candidate = self.document_path(id.name(), &version);
        debug!("StoreLayout::diagnose('{}') - candidate='{}'", id, candidate.display());

        if candidate.is_file() {
            Resolution::Resolved(ResolvedPath(candidate))
        } else if from_manifest {
            warn!(
                "Manifest for '{}' names latest '{}' but {} does not exist",
                id.name(),
                version,
                candidate.display()
            );
            Resolution::DanglingLatest {
                latest: version,
                candidate,
            }
        } else {
            Resolution::VersionMissing { version, candidate }
        }
    }

    pub fn resolve(
        &self,
        id: &AssetIdentifier,
        manifests: &dyn ManifestSource,
    ) -> Option<ResolvedPath> {
        self.diagnose(id, manifests).into_resolved()
    }

    /// Map a document path inside the store back to its version-explicit
    /// identifier. Paths that do not follow the layout yield `None`.
    pub fn identifier_for_path(&self, path: &Path) -> Option<AssetIdentifier> {
        let path = normalize_path(path);
        let relative = path.strip_prefix(&self.root).ok()?;

        let parts: Vec<&str> = relative
            .components()
            .map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Option<_>>()?;

        let [name, version_dir, file_name] = parts.as_slice() else {
            return None;
        };
        if *file_name != format!("{}.{}", name, self.extension) {
            return None;
        }

        let version = VersionLabel::from_dir_name(version_dir)?;
        Some(AssetIdentifier::latest(name).ok()?.with_version(version))
    }
}

/// Make a path absolute and collapse `.` and `..` segments without touching
/// the filesystem, so equal locations compare equal as strings.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{FsManifests, MANIFEST_FILE};

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("assetpath_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// chair_0 with v1..v10 and a manifest pointing at v10
    fn chair_store() -> PathBuf {
        let root = temp_dir();
        let asset_dir = root.join("chair_0");
        for i in 1..=10 {
            let version_dir = asset_dir.join(format!("v{}", i));
            fs::create_dir_all(&version_dir).unwrap();
            fs::write(version_dir.join("chair_0.usd"), format!("chair_0 v{}", i)).unwrap();
        }
        fs::write(
            asset_dir.join(MANIFEST_FILE),
            r#"{"name": "chair_0", "latest": "v10"}"#,
        )
        .unwrap();
        root
    }

    fn id(raw: &str) -> AssetIdentifier {
        AssetIdentifier::parse(raw).unwrap()
    }

    #[test]
    fn test_resolve_latest_and_explicit() {
        let root = chair_store();
        let layout = StoreLayout::new(&root);
        let manifests = FsManifests::new(layout.root());
        let expected = normalize_path(&root.join("chair_0").join("v10").join("chair_0.usd"));

        let latest = layout.resolve(&id("asset:chair_0"), &manifests).unwrap();
        assert_eq!(latest.as_path(), expected.as_path());

        let explicit = layout.resolve(&id("asset:chair_0?v=10"), &manifests).unwrap();
        assert_eq!(explicit, latest);

        let older = layout.resolve(&id("asset:chair_0?v=3"), &manifests).unwrap();
        assert_eq!(fs::read_to_string(older).unwrap(), "chair_0 v3");

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_missing_version_is_no_result() {
        let root = chair_store();
        let layout = StoreLayout::new(&root);
        let manifests = FsManifests::new(layout.root());

        assert!(layout.resolve(&id("asset:chair_0?v=999"), &manifests).is_none());
        assert!(matches!(
            layout.diagnose(&id("asset:chair_0?v=999"), &manifests),
            Resolution::VersionMissing { .. }
        ));

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_missing_manifest_is_no_result() {
        let root = chair_store();
        fs::create_dir_all(root.join("table").join("v1")).unwrap();
        fs::write(root.join("table").join("v1").join("table.usd"), "table").unwrap();
        let layout = StoreLayout::new(&root);
        let manifests = FsManifests::new(layout.root());

        assert_eq!(
            layout.diagnose(&id("asset:table"), &manifests),
            Resolution::ManifestMissing
        );
        assert!(layout.resolve(&id("asset:table?v=1"), &manifests).is_some());

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_corrupt_manifest_is_no_result() {
        let root = chair_store();
        fs::write(root.join("chair_0").join(MANIFEST_FILE), "not json").unwrap();
        let layout = StoreLayout::new(&root);
        let manifests = FsManifests::new(layout.root());

        assert!(matches!(
            layout.diagnose(&id("asset:chair_0"), &manifests),
            Resolution::ManifestCorrupt(_)
        ));
        assert!(layout.resolve(&id("asset:chair_0?v=10"), &manifests).is_some());

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_dangling_latest() {
        let root = chair_store();
        fs::write(
            root.join("chair_0").join(MANIFEST_FILE),
            r#"{"name": "chair_0", "latest": "11"}"#,
        )
        .unwrap();
        let layout = StoreLayout::new(&root);
        let manifests = FsManifests::new(layout.root());

        let resolution = layout.diagnose(&id("asset:chair_0"), &manifests);
        assert!(matches!(resolution, Resolution::DanglingLatest { ref latest, .. } if latest.as_str() == "11"));
        assert!(resolution.into_resolved().is_none());

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_manifest_latest_cannot_leave_store() {
        let base = temp_dir();
        let root = base.join("store");
        fs::create_dir_all(root.join("chair_0")).unwrap();
        fs::write(
            root.join("chair_0").join(MANIFEST_FILE),
            r#"{"latest": "1/../../../outside"}"#,
        )
        .unwrap();
        fs::create_dir_all(base.join("outside")).unwrap();
        fs::write(base.join("outside").join("chair_0.usd"), "outside").unwrap();
        let layout = StoreLayout::new(&root);
        let manifests = FsManifests::new(layout.root());

        assert!(matches!(
            layout.diagnose(&id("asset:chair_0"), &manifests),
            Resolution::ManifestCorrupt(_)
        ));
        assert!(layout.resolve(&id("asset:chair_0"), &manifests).is_none());
        assert!(layout.candidate_path(&id("asset:chair_0"), &manifests).is_none());

        fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn test_prefixed_label_has_own_directory() {
        let root = chair_store();
        let prefixed_dir = root.join("chair_0").join("vv10");
        fs::create_dir_all(&prefixed_dir).unwrap();
        fs::write(prefixed_dir.join("chair_0.usd"), "chair_0 vv10").unwrap();
        let layout = StoreLayout::new(&root);
        let manifests = FsManifests::new(layout.root());

        let plain = layout.resolve(&id("asset:chair_0?v=10"), &manifests).unwrap();
        let prefixed = layout.resolve(&id("asset:chair_0?v=v10"), &manifests).unwrap();
        assert_eq!(fs::read_to_string(&plain).unwrap(), "chair_0 v10");
        assert_eq!(fs::read_to_string(&prefixed).unwrap(), "chair_0 vv10");

        // The manifest's "v10" is a directory name and still means v10/
        let latest = layout.resolve(&id("asset:chair_0"), &manifests).unwrap();
        assert_eq!(latest, plain);

        for raw in ["asset:chair_0?v=10", "asset:chair_0?v=v10"] {
            let resolved = layout.resolve(&id(raw), &manifests).unwrap();
            let back = layout.identifier_for_path(resolved.as_path()).unwrap();
            assert_eq!(back.to_string(), raw);
        }

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_candidate_path_skips_existence_check() {
        let root = chair_store();
        let layout = StoreLayout::new(&root);
        let manifests = FsManifests::new(layout.root());

        let candidate = layout
            .candidate_path(&id("asset:chair_0?v=11"), &manifests)
            .unwrap();
        assert!(candidate.ends_with(Path::new("chair_0/v11/chair_0.usd")));
        assert!(!candidate.exists());

        assert!(layout.candidate_path(&id("asset:table"), &manifests).is_none());

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_custom_extension() {
        let root = temp_dir();
        let version_dir = root.join("lamp").join("v2");
        fs::create_dir_all(&version_dir).unwrap();
        fs::write(version_dir.join("lamp.usda"), "lamp").unwrap();

        let layout = StoreLayout::new(&root).with_extension(".usda");
        let manifests = FsManifests::new(layout.root());
        assert_eq!(layout.extension(), "usda");
        assert!(layout.resolve(&id("asset:lamp?v=2"), &manifests).is_some());

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_normalized_root() {
        let root = chair_store();
        let dotted = root.join("chair_0").join("..").join(".");
        let layout = StoreLayout::new(&dotted);
        let manifests = FsManifests::new(layout.root());

        let resolved = layout.resolve(&id("asset:chair_0"), &manifests).unwrap();
        let expected = normalize_path(&root).join("chair_0").join("v10").join("chair_0.usd");
        assert_eq!(resolved.to_string(), expected.display().to_string());

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_normalize_path() {
        let base = std::env::temp_dir();
        let messy = base.join("a").join(".").join("b").join("..").join("c");
        assert_eq!(normalize_path(&messy), normalize_path(&base.join("a").join("c")));
        assert!(normalize_path(Path::new("relative/dir")).is_absolute());
    }

    #[test]
    fn test_identifier_for_path() {
        let root = temp_dir();
        let layout = StoreLayout::new(&root);

        let doc = layout.document_path("chair_0", &VersionLabel::new("10").unwrap());
        let id = layout.identifier_for_path(&doc).unwrap();
        assert_eq!(id.to_string(), "asset:chair_0?v=10");

        let outside = std::env::temp_dir().join("elsewhere").join("chair_0.usd");
        assert!(layout.identifier_for_path(&outside).is_none());

        let wrong_file = root.join("chair_0").join("v10").join("table.usd");
        assert!(layout.identifier_for_path(&wrong_file).is_none());

        let manifest = layout.manifest_path("chair_0");
        assert!(layout.identifier_for_path(&manifest).is_none());

        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_resolved_path_access() {
        let root = chair_store();
        let layout = StoreLayout::new(&root);
        let manifests = FsManifests::new(layout.root());

        let resolved = layout.resolve(&id("asset:chair_0"), &manifests).unwrap();
        assert!(resolved.modified().is_some());

        let mut content = String::new();
        io::Read::read_to_string(&mut resolved.open().unwrap(), &mut content).unwrap();
        assert_eq!(content, "chair_0 v10");

        fs::remove_dir_all(&root).ok();
    }
}
