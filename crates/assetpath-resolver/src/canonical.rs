//! Identifier canonicalization

use assetpath_core::AssetIdentifier;
use log::debug;

/// The form of an identifier to persist inside documents.
///
/// Well-formed identifiers are kept exactly as written so that a stored
/// reference keeps its own version pin (or lack of one) rather than whatever
/// the store currently calls latest. Strings that do not parse are passed
/// through unchanged.
pub fn canonicalize(raw: &str) -> String {
    if let Err(e) = AssetIdentifier::parse(raw) {
        debug!("canonicalize - keeping '{}' unchanged: {}", raw, e);
    }
    raw.to_string()
}

/// True when `raw` is a well-formed `asset:` identifier
pub fn is_canonical(raw: &str) -> bool {
    AssetIdentifier::parse(raw).is_ok()
}
