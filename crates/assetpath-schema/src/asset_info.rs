//! The `AssetInfoAPI` metadata schema
//!
//! Four string attributes describing where a prim's content came from. The
//! schema is opt-in per prim: `AssetInfoApi::apply` records the marker, after
//! which unauthored attributes read back as their defaults.

use crate::stage::PrimDef;
use assetpath_core::{AssetPathError, Result};
use serde::{Deserialize, Serialize};

/// Name recorded in a prim's `api_schemas` when the schema is applied
pub const ASSET_INFO_API: &str = "AssetInfoAPI";

/// The attributes contributed by `AssetInfoAPI`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetInfoField {
    Version,
    Author,
    Status,
    Description,
}

impl AssetInfoField {
    pub const ALL: [AssetInfoField; 4] = [
        AssetInfoField::Version,
        AssetInfoField::Author,
        AssetInfoField::Status,
        AssetInfoField::Description,
    ];

    pub fn attribute_name(self) -> &'static str {
        match self {
            AssetInfoField::Version => "assetInfo:version",
            AssetInfoField::Author => "assetInfo:author",
            AssetInfoField::Status => "assetInfo:status",
            AssetInfoField::Description => "assetInfo:description",
        }
    }

    pub fn default_value(self) -> &'static str {
        match self {
            AssetInfoField::Status => "draft",
            _ => "",
        }
    }

    pub fn from_attribute_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.attribute_name() == name)
    }
}

/// All `AssetInfoAPI` values of one prim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub version: String,
    pub author: String,
    pub status: String,
    pub description: String,
}

impl Default for AssetInfo {
    fn default() -> Self {
        Self {
            version: AssetInfoField::Version.default_value().to_string(),
            author: AssetInfoField::Author.default_value().to_string(),
            status: AssetInfoField::Status.default_value().to_string(),
            description: AssetInfoField::Description.default_value().to_string(),
        }
    }
}

impl AssetInfo {
    pub fn get(&self, field: AssetInfoField) -> &str {
        match field {
            AssetInfoField::Version => &self.version,
            AssetInfoField::Author => &self.author,
            AssetInfoField::Status => &self.status,
            AssetInfoField::Description => &self.description,
        }
    }

    pub fn set(&mut self, field: AssetInfoField, value: impl Into<String>) {
        let slot = match field {
            AssetInfoField::Version => &mut self.version,
            AssetInfoField::Author => &mut self.author,
            AssetInfoField::Status => &mut self.status,
            AssetInfoField::Description => &mut self.description,
        };
        *slot = value.into();
    }
}

/// Accessors for `AssetInfoAPI` on a prim
pub struct AssetInfoApi;

impl AssetInfoApi {
    /// Apply the schema. Applying twice is a no-op; always returns true.
    pub fn apply(prim: &mut PrimDef) -> bool {
        prim.add_api(ASSET_INFO_API);
        true
    }

    pub fn has(prim: &PrimDef) -> bool {
        prim.has_api(ASSET_INFO_API)
    }

    /// The authored value, or the default if unauthored. `None` when the
    /// schema is not applied.
    pub fn get(prim: &PrimDef, field: AssetInfoField) -> Option<String> {
        if !Self::has(prim) {
            return None;
        }
        let value = prim
            .attribute(field.attribute_name())
            .and_then(|v| v.as_str())
            .unwrap_or(field.default_value());
        Some(value.to_string())
    }

    pub fn set(prim: &mut PrimDef, field: AssetInfoField, value: &str) -> Result<()> {
        if !Self::has(prim) {
            return Err(AssetPathError::SchemaError(format!(
                "Cannot set '{}': {} is not applied",
                field.attribute_name(),
                ASSET_INFO_API
            )));
        }
        prim.set_attribute(field.attribute_name(), value);
        Ok(())
    }

    /// Every value at once, defaults filled in
    pub fn read(prim: &PrimDef) -> Option<AssetInfo> {
        if !Self::has(prim) {
            return None;
        }
        let mut info = AssetInfo::default();
        for field in AssetInfoField::ALL {
            if let Some(value) = prim.attribute(field.attribute_name()).and_then(|v| v.as_str()) {
                info.set(field, value);
            }
        }
        Some(info)
    }

    /// Author every value, applying the schema if needed
    pub fn write(prim: &mut PrimDef, info: &AssetInfo) {
        Self::apply(prim);
        for field in AssetInfoField::ALL {
            prim.set_attribute(field.attribute_name(), info.get(field));
        }
    }

    /// Check that authored `assetInfo:*` attributes are strings
    pub fn validate(prim_path: &str, prim: &PrimDef) -> Result<()> {
        for (name, value) in &prim.attributes {
            if AssetInfoField::from_attribute_name(name).is_some() && !value.is_str() {
                return Err(AssetPathError::SchemaError(format!(
                    "Prim '{}': attribute '{}' must be a string, got {}",
                    prim_path,
                    name,
                    value.type_str()
                )));
            }
        }
        Ok(())
    }
}
