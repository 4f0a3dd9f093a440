//! Manifest and version listing commands

use super::StoreArgs;
use anyhow::{Context, Result};

pub fn latest(store: &StoreArgs, name: &str) -> Result<()> {
    let resolver = store.resolver()?;
    let latest = resolver
        .latest_version(name)
        .with_context(|| format!("Failed to read manifest for '{}'", name))?;

    match latest {
        Some(label) => println!("{}", label),
        None => anyhow::bail!("Asset '{}' has no versions.json", name),
    }
    Ok(())
}

pub fn list(store: &StoreArgs, name: &str) -> Result<()> {
    let resolver = store.resolver()?;
    let versions = resolver
        .versions(name)
        .with_context(|| format!("Failed to list versions of '{}'", name))?;

    if versions.is_empty() {
        println!("No published versions of '{}'", name);
        return Ok(());
    }

    // A corrupt manifest should not hide the listing
    let latest = resolver.latest_version(name).ok().flatten();
    for version in &versions {
        let marker = match &latest {
            Some(l) if l.dir_name() == version.dir_name() => " (latest)",
            _ => "",
        };
        println!("  {}{}", version.dir_name(), marker);
    }
    Ok(())
}
