// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Meshtally
//!
//! Mesh metrics and material take-off for 3D model viewers. Measures the
//! parts of a scene (surface area, bounding box, volume estimate), classifies
//! each into a material category and totals the quantities in physical units.
//! Also carries the viewer's local trial gate, selection/X-ray state and
//! offline asset cache.

pub mod cli;
pub mod config;
pub mod geometry;
pub mod io;
pub mod materials;
pub mod precache;
pub mod scan;
pub mod scene;
pub mod selection;
pub mod trial;
pub mod units;

#[cfg(feature = "wasm")]
pub mod ffi;

pub use config::MeshtallyConfig;
pub use geometry::{GeometryMetrics, MeshGeometry, Primitive};
pub use materials::{MaterialCategory, MaterialClassifier, MaterialRegistry};
pub use scan::{aggregate_all, MaterialReport, MetadataStore, ResultsPresenter, ScanReport, Scanner};
pub use scene::{NodeId, NodeKind, SceneNode, UniqueIds};
pub use units::{CalculationUnit, Dimensions, SceneUnit};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scan every model and aggregate the totals in one call
pub fn tally(models: &[SceneNode], config: &MeshtallyConfig) -> ScanReport {
    let scanner = Scanner::from_config(config);
    let mut store = MetadataStore::new();
    scanner.scan_all(models, &mut store);
    let materials = aggregate_all(models, &store, &config.materials, &mut |_: &MaterialReport| {});
    ScanReport::new(config.unit, models, &store, materials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_tally_unit_cube() {
        let cube = Primitive::cuboid(Vector3::new(1.0, 1.0, 1.0), false).to_geometry();
        let models = vec![SceneNode::part("cube", "", cube)];
        let config = MeshtallyConfig {
            unit: SceneUnit::Meter,
            ..MeshtallyConfig::default()
        };

        let report = tally(&models, &config);
        assert_eq!(report.part_count(), 1);
        assert_eq!(report.materials.totals.value("VOLUME"), 1.0);
        assert_eq!(report.materials.formatted[0].value, "1.000");
    }
}
