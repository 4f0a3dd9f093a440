//! Stage document format and persistence

use crate::asset_info::AssetInfoApi;
use assetpath_core::{AssetPathError, Result};
use assetpath_resolver::ResolvedPath;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Root structure of a stage TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageFile {
    pub stage: StageMetadata,
    #[serde(default)]
    pub prims: BTreeMap<String, PrimDef>,
}

/// Stage metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_prim: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A prim: typed node with applied API schemas, string metadata and attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimDef {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_schemas: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, toml::Value>,
}

impl PrimDef {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(|s| s.as_str())
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<&toml::Value> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<toml::Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn has_api(&self, schema: &str) -> bool {
        self.api_schemas.iter().any(|s| s == schema)
    }

    /// Record an applied API schema. Returns false if it was already applied.
    pub fn add_api(&mut self, schema: &str) -> bool {
        if self.has_api(schema) {
            return false;
        }
        self.api_schemas.push(schema.to_string());
        true
    }
}

/// An in-memory stage document
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    file: StageFile,
}

impl Stage {
    /// Create an empty stage
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            file: StageFile {
                stage: StageMetadata {
                    name: name.into(),
                    default_prim: None,
                    description: None,
                },
                prims: BTreeMap::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.file.stage.name
    }

    pub fn metadata(&self) -> &StageMetadata {
        &self.file.stage
    }

    pub fn set_default_prim(&mut self, path: impl Into<String>) {
        self.file.stage.default_prim = Some(path.into());
    }

    /// Define a prim at an absolute path (`/Name` or `/Parent/Child`).
    /// Redefining an existing prim updates its type and keeps everything else.
    pub fn define_prim(&mut self, path: &str, type_name: &str) -> Result<&mut PrimDef> {
        validate_prim_path(path)?;
        let prim = self.file.prims.entry(path.to_string()).or_default();
        prim.type_name = type_name.to_string();
        Ok(prim)
    }

    pub fn prim(&self, path: &str) -> Option<&PrimDef> {
        self.file.prims.get(path)
    }

    pub fn prim_mut(&mut self, path: &str) -> Option<&mut PrimDef> {
        self.file.prims.get_mut(path)
    }

    pub fn prim_paths(&self) -> impl Iterator<Item = &str> {
        self.file.prims.keys().map(|k| k.as_str())
    }

    pub fn file(&self) -> &StageFile {
        &self.file
    }

    /// Serialize to a TOML string
    pub fn to_toml_string(&self) -> Result<String> {
        let content = toml::to_string_pretty(&self.file)?;
        Ok(content)
    }

    /// Parse and validate a TOML stage
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: StageFile = toml::from_str(content)?;

        for (path, prim) in &file.prims {
            validate_prim_path(path)?;
            AssetInfoApi::validate(path, prim)?;
        }

        Ok(Self { file })
    }

    /// Write the stage to a file, creating parent directories
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        debug!("Stage::export('{}') -> '{}'", self.name(), path.display());
        Ok(())
    }

    /// Load a stage from a file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load the stage an asset identifier resolved to
    pub fn open_resolved(resolved: &ResolvedPath) -> Result<Self> {
        Self::open(resolved.as_path())
    }
}

fn validate_prim_path(path: &str) -> Result<()> {
    let valid = path
        .strip_prefix('/')
        .map(|rest| !rest.is_empty() && rest.split('/').all(|segment| !segment.is_empty()))
        .unwrap_or(false);

    if valid {
        Ok(())
    } else {
        Err(AssetPathError::StageError(format!(
            "Invalid prim path '{}': must be absolute like '/Name'",
            path
        )))
    }
}
