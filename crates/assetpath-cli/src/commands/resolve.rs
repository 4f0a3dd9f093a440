//! Resolve, canonicalize and identify commands

use super::StoreArgs;
use anyhow::{Context, Result};
use assetpath_core::AssetIdentifier;
use assetpath_resolver::{AssetResolver, Resolution};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ResolveRow {
    identifier: String,
    resolved: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

pub fn run(store: &StoreArgs, identifiers: &[String], explain: bool, format: &str) -> Result<()> {
    let resolver = store.resolver()?;

    let mut rows = Vec::new();
    for raw in identifiers {
        let id = AssetIdentifier::parse(raw)
            .with_context(|| format!("Invalid identifier '{}'", raw))?;
        let resolution = resolver.diagnose(&id);
        let reason = match &resolution {
            Resolution::Resolved(_) => None,
            other => Some(other.to_string()),
        };
        rows.push(ResolveRow {
            identifier: raw.clone(),
            resolved: resolution.into_resolved().map(|p| p.to_string()),
            reason: if explain { reason } else { None },
        });
    }

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&rows)?),
        "text" => {
            for row in &rows {
                match (&row.resolved, &row.reason) {
                    (Some(path), _) => println!("{} -> {}", row.identifier, path),
                    (None, Some(reason)) => println!("{} -> (none: {})", row.identifier, reason),
                    (None, None) => println!("{} -> (none)", row.identifier),
                }
            }
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    }

    Ok(())
}

pub fn canonicalize(store: &StoreArgs, identifier: &str) -> Result<()> {
    let resolver = store.resolver()?;
    println!("{}", resolver.canonicalize(identifier));
    Ok(())
}

pub fn identify(store: &StoreArgs, path: &str) -> Result<()> {
    let resolver = store.resolver()?;
    match resolver.identifier_for_path(Path::new(path)) {
        Some(id) => println!("{}", id),
        None => anyhow::bail!("'{}' is not a versioned document inside the asset store", path),
    }
    Ok(())
}
