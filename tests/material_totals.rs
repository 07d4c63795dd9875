// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Aggregation of part values into per-material totals

use anyhow::Result;
use approx::assert_relative_eq;
use meshtally::geometry::{MeshGeometry, Primitive};
use meshtally::scan::{aggregate_all, CollectingPresenter, MaterialReport, MetadataStore, Scanner};
use meshtally::{MaterialCategory, MaterialRegistry, NodeId, SceneNode, SceneUnit};
use nalgebra::{Point3, Vector3};

fn part(id: &str, name: &str, x: f64, y: f64, z: f64) -> SceneNode {
    SceneNode::part(id, name, Primitive::cuboid(Vector3::new(x, y, z), false).to_geometry())
}

/// Two models: a sheet, a bar and two small parts
fn workshop() -> Vec<SceneNode> {
    vec![
        SceneNode::group(
            "a",
            "Frame",
            vec![
                part("a/plate", "Chapa", 1000.0, 500.0, 2.0),
                part("a/bar", "", 25.0, 25.0, 1500.0),
            ],
        ),
        SceneNode::group(
            "b",
            "Fittings",
            vec![part("b/0", "", 10.0, 10.0, 10.0), part("b/1", "", 20.0, 15.0, 5.0)],
        ),
    ]
}

#[test]
fn test_totals_by_category() -> Result<()> {
    let models = workshop();
    let registry = MaterialRegistry::default();
    let mut store = MetadataStore::new();
    Scanner::new(SceneUnit::Millimeter).scan_all(&models, &mut store);

    let mut presenter = CollectingPresenter::default();
    let report = aggregate_all(&models, &store, &registry, &mut presenter);

    let plate_m2 = 2.0 * (1000.0 * 500.0 + 1000.0 * 2.0 + 500.0 * 2.0) / 1.0e6;
    assert_relative_eq!(report.totals.value("CHAPA"), plate_m2, max_relative = 1e-12);
    assert_relative_eq!(report.totals.value("LINEAR"), 1500.0);
    assert_eq!(report.totals.value("UNITARIO"), 2.0);
    assert_eq!(report.totals.value("VOLUME"), 0.0);

    // zero totals are left out of the display rows
    let keys: Vec<&str> = report.formatted.iter().map(|row| row.key.as_str()).collect();
    assert_eq!(keys, ["CHAPA", "LINEAR", "UNITARIO"]);
    assert_eq!(report.formatted[1].unit, "mm");
    assert_eq!(report.formatted[1].value, "1500.000");
    assert_eq!(report.formatted[2].value, "2");

    assert_eq!(presenter.reports.len(), 1);
    assert_eq!(presenter.reports[0], report);

    Ok(())
}

#[test]
fn test_aggregation_is_idempotent() -> Result<()> {
    let models = workshop();
    let registry = MaterialRegistry::default();
    let mut store = MetadataStore::new();
    Scanner::new(SceneUnit::Millimeter).scan_all(&models, &mut store);

    let mut presenter = CollectingPresenter::default();
    let first = aggregate_all(&models, &store, &registry, &mut presenter);
    let second = aggregate_all(&models, &store, &registry, &mut presenter);

    assert_eq!(first, second);
    assert_eq!(presenter.reports.len(), 2);

    Ok(())
}

#[test]
fn test_reassignment_moves_value_between_totals() -> Result<()> {
    let models = workshop();
    let registry = MaterialRegistry::default();
    let mut store = MetadataStore::new();
    Scanner::new(SceneUnit::Millimeter).scan_all(&models, &mut store);

    store.reassign_material(&NodeId::from("a/bar"), MaterialCategory::Unit);
    let report = aggregate_all(&models, &store, &registry, &mut |_: &MaterialReport| {});

    assert_eq!(report.totals.value("LINEAR"), 0.0);
    assert_eq!(report.totals.value("UNITARIO"), 3.0);

    Ok(())
}

#[test]
fn test_unscanned_parts_are_skipped() -> Result<()> {
    let models = workshop();
    let registry = MaterialRegistry::default();
    let mut store = MetadataStore::new();
    Scanner::new(SceneUnit::Millimeter).scan(&models[1], &mut store);

    let report = aggregate_all(&models, &store, &registry, &mut |_: &MaterialReport| {});
    assert_eq!(report.totals.value("UNITARIO"), 2.0);
    assert_eq!(report.totals.value("CHAPA"), 0.0);
    assert_eq!(report.formatted.len(), 1);

    Ok(())
}

#[test]
fn test_empty_models_present_empty_report() -> Result<()> {
    let registry = MaterialRegistry::default();
    let store = MetadataStore::new();
    let mut presenter = CollectingPresenter::default();

    let report = aggregate_all(&[], &store, &registry, &mut presenter);

    assert!(!report.has_results());
    assert_eq!(report.totals.len(), 4);
    assert!(report.totals.iter().all(|total| total.value == 0.0));
    assert_eq!(presenter.reports.len(), 1);

    Ok(())
}

#[test]
fn test_custom_labels_drive_keys() -> Result<()> {
    let models = workshop();
    let registry = MaterialRegistry {
        sheet: "SHEET METAL (m²)".to_string(),
        volume: "SOLID (m³)".to_string(),
        linear: "PROFILE (m)".to_string(),
        unit: "HARDWARE (pcs)".to_string(),
    };
    let mut store = MetadataStore::new();
    Scanner::new(SceneUnit::Millimeter).scan_all(&models, &mut store);

    let report = aggregate_all(&models, &store, &registry, &mut |_: &MaterialReport| {});
    assert_eq!(report.totals.value("HARDWARE"), 2.0);
    assert_relative_eq!(report.totals.value("PROFILE"), 1500.0);
    assert_eq!(report.totals.get("SHEET METAL").map(|t| t.unit.as_str()), Some("m²"));

    Ok(())
}

#[test]
fn test_display_rounds_ties_up() -> Result<()> {
    // 250 x 250 mm flat plate: 62 500 mm² = 0.0625 m²
    let plate = MeshGeometry::indexed(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(250.0, 0.0, 0.0),
            Point3::new(250.0, 250.0, 0.0),
            Point3::new(0.0, 250.0, 0.0),
        ],
        vec![0, 1, 2, 0, 2, 3],
    );
    let models = vec![SceneNode::part("plate", "Chapa", plate)];
    let mut store = MetadataStore::new();
    Scanner::new(SceneUnit::Millimeter).scan_all(&models, &mut store);

    let report = aggregate_all(&models, &store, &MaterialRegistry::default(), &mut |_: &MaterialReport| {});
    assert_eq!(report.totals.value("CHAPA"), 0.0625);
    assert_eq!(report.formatted[0].value, "0.063");

    Ok(())
}
