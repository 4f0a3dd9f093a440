//! Asset identifiers and version labels

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scheme prefix every asset identifier starts with
pub const ASSET_SCHEME: &str = "asset:";

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// An opaque tag naming one published revision of an asset.
///
/// Labels are stored verbatim and always live in a `v<label>` directory, so
/// `?v=10` names `v10/` and `?v=v10` names `vv10/`. A label never contains a
/// path separator or `?`, and is never `.` or `..`.
#[derive(Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct VersionLabel(String);

impl VersionLabel {
    /// Create a label, rejecting text that could not name a single directory
    pub fn new(label: impl Into<String>) -> Option<Self> {
        let label = label.into();
        if is_label(&label) {
            Some(Self(label))
        } else {
            None
        }
    }

    /// Create a label from a manifest's `latest` entry.
    ///
    /// Publishing tools record the directory name there (`"v10"`), so a `v`
    /// followed only by digits is read as the bare label (`"10"`). Any other
    /// text is taken verbatim.
    pub fn from_manifest(text: &str) -> Option<Self> {
        match text.strip_prefix('v') {
            Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                Self::new(digits)
            }
            _ => Self::new(text),
        }
    }

    /// Recover the label from a `v<label>` directory name
    pub fn from_dir_name(dir: &str) -> Option<Self> {
        dir.strip_prefix('v').and_then(|rest| Self::new(rest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the directory holding this version
    pub fn dir_name(&self) -> String {
        format!("v{}", self.0)
    }

    /// Numeric value of decimal labels, used for ordering listings
    pub fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

fn is_label(text: &str) -> bool {
    !text.is_empty()
        && !text.contains(is_separator)
        && !text.contains('?')
        && text != "."
        && text != ".."
}

impl TryFrom<String> for VersionLabel {
    type Error = String;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Self::new(label.clone()).ok_or_else(|| format!("invalid version label {:?}", label))
    }
}

impl From<VersionLabel> for String {
    fn from(label: VersionLabel) -> Self {
        label.0
    }
}

impl fmt::Debug for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionLabel({})", self.0)
    }
}

impl fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A parsed `asset:<name>[?v=<label>]` identifier.
///
/// The name never contains path separators, drive prefixes or query
/// characters, so it can be
/// joined onto the store root directly. A missing version means "whatever the
/// asset's manifest currently calls latest".
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct AssetIdentifier {
    name: String,
    version: Option<VersionLabel>,
}

impl AssetIdentifier {
    /// Parse the textual identifier form
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let rest = raw
            .strip_prefix(ASSET_SCHEME)
            .ok_or_else(|| ParseError::UnrecognizedScheme(raw.to_string()))?;

        let (name, query) = match rest.split_once('?') {
            Some((name, query)) => (name, Some(query)),
            None => (rest, None),
        };

        validate_name(name)?;
        let version = query.map(parse_query).transpose()?;

        Ok(Self {
            name: name.to_string(),
            version,
        })
    }

    /// Build an identifier that tracks the manifest's latest version
    pub fn latest(name: &str) -> Result<Self, ParseError> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            version: None,
        })
    }

    /// Pin this identifier to a specific version
    pub fn with_version(mut self, version: VersionLabel) -> Self {
        self.version = Some(version);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&VersionLabel> {
        self.version.as_ref()
    }

    /// True when the version is left to the manifest
    pub fn is_latest(&self) -> bool {
        self.version.is_none()
    }
}

impl FromStr for AssetIdentifier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AssetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ASSET_SCHEME, self.name)?;
        if let Some(version) = &self.version {
            write!(f, "?v={}", version)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ParseError> {
    if name.is_empty() {
        return Err(ParseError::EmptyName);
    }
    if name.contains(is_separator)
        || name.contains('?')
        || name.contains(':')
        || name == "."
        || name == ".."
    {
        return Err(ParseError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Parse the query part after `?`. Only `v=<label>` is understood; other keys
/// are rejected by name so callers see exactly what was unsupported.
fn parse_query(query: &str) -> Result<VersionLabel, ParseError> {
    let malformed = || ParseError::MalformedQuery(query.to_string());
    let mut version = None;

    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').ok_or_else(malformed)?;
        if key.is_empty() || value.is_empty() {
            return Err(malformed());
        }
        if key != "v" {
            return Err(ParseError::UnsupportedQueryKey(key.to_string()));
        }
        if version.is_some() {
            return Err(malformed());
        }
        version = Some(VersionLabel::new(value).ok_or_else(malformed)?);
    }

    version.ok_or_else(malformed)
}
