//! AssetInfo inspection command

use super::StoreArgs;
use anyhow::{Context, Result};
use assetpath_resolver::AssetResolver;
use assetpath_schema::{AssetInfoApi, AssetInfoField, Stage};

pub fn run(store: &StoreArgs, identifier: &str, prim_path: Option<&str>) -> Result<()> {
    let resolver = store.resolver()?;
    let resolved = resolver
        .resolve_str(identifier)
        .with_context(|| format!("Invalid identifier '{}'", identifier))?
        .ok_or_else(|| anyhow::anyhow!("'{}' did not resolve", identifier))?;

    let stage = Stage::open_resolved(&resolved)
        .with_context(|| format!("Failed to open stage {}", resolved))?;

    let prim_path = match prim_path {
        Some(path) => path.to_string(),
        None => stage
            .metadata()
            .default_prim
            .clone()
            .or_else(|| stage.prim_paths().next().map(str::to_string))
            .ok_or_else(|| anyhow::anyhow!("Stage {} has no prims", resolved))?,
    };
    let prim = stage
        .prim(&prim_path)
        .ok_or_else(|| anyhow::anyhow!("Prim '{}' not found in {}", prim_path, resolved))?;

    println!("Asset: {}", identifier);
    println!("Path:  {}", resolved);
    println!("Prim:  {}", prim_path);

    match AssetInfoApi::read(prim) {
        Some(info) => {
            for field in AssetInfoField::ALL {
                println!("  {:<22} {:?}", field.attribute_name(), info.get(field));
            }
        }
        None => println!("  (AssetInfoAPI not applied)"),
    }

    Ok(())
}
