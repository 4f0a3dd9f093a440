//! Resolve a versioned asset, open its stage, and round-trip AssetInfo metadata

use assetpath_resolver::{AssetResolver, StoreResolver, MANIFEST_FILE};
use assetpath_schema::{AssetInfo, AssetInfoApi, AssetInfoField, Stage};
use std::fs;
use std::path::{Path, PathBuf};

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("assetpath_test_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// chair_0 published as v1..v10, manifest latest = v10
fn create_chair_store(root: &Path) {
    let asset_dir = root.join("chair_0");
    for i in 1..=10 {
        let mut stage = Stage::new("chair_0");
        stage.set_default_prim("/chair_0");
        stage
            .define_prim("/chair_0", "Xform")
            .unwrap()
            .set_metadata("comment", format!("chair_0 v{}", i));
        stage
            .define_prim("/chair_0/Cube", "Cube")
            .unwrap()
            .set_metadata("comment", "Random prim: Cube");
        stage
            .export(asset_dir.join(format!("v{}", i)).join("chair_0.usd"))
            .unwrap();
    }
    fs::write(
        asset_dir.join(MANIFEST_FILE),
        r#"{
  "name": "chair_0",
  "latest": "v10"
}"#,
    )
    .unwrap();
}

#[test]
fn test_open_stage_via_latest_identifier() {
    let root = temp_dir();
    create_chair_store(&root);
    let resolver = StoreResolver::new(&root).with_cache();

    let resolved = resolver.resolve_str("asset:chair_0").unwrap().unwrap();
    let stage = Stage::open_resolved(&resolved).unwrap();
    let prim = stage.prim("/chair_0").unwrap();
    assert_eq!(prim.metadata("comment"), Some("chair_0 v10"));

    let pinned = resolver.resolve_str("asset:chair_0?v=3").unwrap().unwrap();
    let stage = Stage::open_resolved(&pinned).unwrap();
    assert_eq!(
        stage.prim("/chair_0").unwrap().metadata("comment"),
        Some("chair_0 v3")
    );

    assert!(resolver.resolve_str("asset:chair_0?v=999").unwrap().is_none());

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_asset_info_survives_export_and_reload() {
    let dir = temp_dir();
    let mut stage = Stage::new("schema_test");
    let prim = stage.define_prim("/TestAsset", "Xform").unwrap();
    assert!(AssetInfoApi::apply(prim));
    AssetInfoApi::set(prim, AssetInfoField::Version, "v10").unwrap();
    AssetInfoApi::set(prim, AssetInfoField::Author, "hideki").unwrap();
    AssetInfoApi::set(prim, AssetInfoField::Status, "published").unwrap();
    AssetInfoApi::set(prim, AssetInfoField::Description, "A test chair asset").unwrap();
    let before = AssetInfoApi::read(prim).unwrap();

    let path = dir.join("_tmp_schema_test.usda");
    stage.export(&path).unwrap();

    let reloaded = Stage::open(&path).unwrap();
    let prim = reloaded.prim("/TestAsset").unwrap();
    assert!(AssetInfoApi::has(prim));
    assert_eq!(AssetInfoApi::read(prim), Some(before));
    assert_eq!(
        AssetInfoApi::get(prim, AssetInfoField::Status).as_deref(),
        Some("published")
    );

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_defaults_survive_reload_unauthored() {
    let dir = temp_dir();
    let mut stage = Stage::new("defaults");
    AssetInfoApi::apply(stage.define_prim("/Defaults", "Xform").unwrap());

    let path = dir.join("defaults.usda");
    stage.export(&path).unwrap();

    let reloaded = Stage::open(&path).unwrap();
    let prim = reloaded.prim("/Defaults").unwrap();
    assert_eq!(AssetInfoApi::read(prim), Some(AssetInfo::default()));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_apply_schema_to_resolved_stage() {
    let root = temp_dir();
    create_chair_store(&root);
    let resolver = StoreResolver::new(&root);

    let resolved = resolver.resolve_str("asset:chair_0").unwrap().unwrap();
    let mut stage = Stage::open_resolved(&resolved).unwrap();
    let prim = stage.prim_mut("/chair_0").unwrap();
    AssetInfoApi::apply(prim);
    AssetInfoApi::set(prim, AssetInfoField::Version, "v10").unwrap();
    AssetInfoApi::set(prim, AssetInfoField::Status, "published").unwrap();

    let prim = stage.prim("/chair_0").unwrap();
    assert!(AssetInfoApi::has(prim));
    assert_eq!(
        AssetInfoApi::get(prim, AssetInfoField::Version).as_deref(),
        Some("v10")
    );

    let reference = resolver.canonicalize("asset:chair_0?v=10");
    assert_eq!(reference, "asset:chair_0?v=10");
    assert_eq!(resolver.resolve_str(&reference).unwrap(), Some(resolved));

    fs::remove_dir_all(&root).ok();
}
