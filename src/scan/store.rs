// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Caller-owned metadata written by the scanner
//!
//! Parts and groups live in separate maps so that a root part can carry both
//! its own measurements and the subtree totals.

use crate::materials::MaterialCategory;
use crate::scene::NodeId;
use crate::units::{CalculationUnit, Dimensions, SceneUnit};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Measurements and classification of a single part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartMetadata {
    /// Surface area in square scene units
    pub area: f64,
    /// Bounding-box volume in cubic scene units
    pub volume: f64,
    pub dimensions: Dimensions,
    pub max_dimension_mm: f64,
    pub scene_unit: SceneUnit,
    pub triangle_count: usize,
    material_type: MaterialCategory,
    calculation_value: f64,
    calculation_unit: CalculationUnit,
}

impl PartMetadata {
    pub fn new(
        area: f64,
        volume: f64,
        dimensions: Dimensions,
        scene_unit: SceneUnit,
        triangle_count: usize,
        material_type: MaterialCategory,
    ) -> Self {
        let mut metadata = Self {
            area,
            volume,
            max_dimension_mm: dimensions.max(),
            dimensions,
            scene_unit,
            triangle_count,
            material_type,
            calculation_value: 0.0,
            calculation_unit: material_type.calculation_unit(),
        };
        metadata.reassign(material_type);
        metadata
    }

    pub fn material_type(&self) -> MaterialCategory {
        self.material_type
    }

    pub fn calculation_value(&self) -> f64 {
        self.calculation_value
    }

    pub fn calculation_unit(&self) -> CalculationUnit {
        self.calculation_unit
    }

    /// Change the category and recompute the calculation value with it
    pub fn reassign(&mut self, category: MaterialCategory) {
        self.material_type = category;
        self.calculation_unit = category.calculation_unit();
        self.calculation_value = match category {
            MaterialCategory::Sheet => self.scene_unit.area_to_square_meters(self.area),
            MaterialCategory::Volume => self.scene_unit.volume_to_cubic_meters(self.volume),
            MaterialCategory::Linear => self.max_dimension_mm,
            MaterialCategory::Unit => 1.0,
        };
    }
}

/// Subtree totals of a group (or of a scanned root)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetadata {
    /// Summed part area in square scene units
    pub area: f64,
    /// Summed part volume in cubic scene units
    pub volume: f64,
    pub part_count: usize,
    pub material_type: MaterialCategory,
    /// Total area in m²
    pub calculation_value: f64,
    pub calculation_unit: CalculationUnit,
}

impl GroupMetadata {
    pub fn new(
        area: f64,
        volume: f64,
        part_count: usize,
        scene_unit: SceneUnit,
        material_type: MaterialCategory,
    ) -> Self {
        Self {
            area,
            volume,
            part_count,
            material_type,
            calculation_value: scene_unit.area_to_square_meters(area),
            calculation_unit: CalculationUnit::SquareMeters,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    parts: AHashMap<NodeId, PartMetadata>,
    groups: AHashMap<NodeId, GroupMetadata>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn part(&self, id: &NodeId) -> Option<&PartMetadata> {
        self.parts.get(id)
    }

    pub fn group(&self, id: &NodeId) -> Option<&GroupMetadata> {
        self.groups.get(id)
    }

    pub(crate) fn insert_part(&mut self, id: NodeId, metadata: PartMetadata) {
        self.parts.insert(id, metadata);
    }

    pub(crate) fn insert_group(&mut self, id: NodeId, metadata: GroupMetadata) {
        self.groups.insert(id, metadata);
    }

    /// Override the category of a scanned part. Returns the new calculation
    /// value, or `None` if the part was never scanned.
    pub fn reassign_material(&mut self, id: &NodeId, category: MaterialCategory) -> Option<f64> {
        let part = self.parts.get_mut(id)?;
        part.reassign(category);
        tracing::debug!(
            "Reassigned {} to {} ({:.6} {})",
            id,
            category,
            part.calculation_value(),
            part.calculation_unit()
        );
        Some(part.calculation_value())
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn len(&self) -> usize {
        self.parts.len() + self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty() && self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.parts.clear();
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cube_metadata(unit: SceneUnit, category: MaterialCategory) -> PartMetadata {
        // 1×1×1 cube in scene units
        let dims = Dimensions::new(
            unit.to_millimeters(1.0),
            unit.to_millimeters(1.0),
            unit.to_millimeters(1.0),
        );
        PartMetadata::new(6.0, 1.0, dims, unit, 12, category)
    }

    #[test]
    fn test_calculation_value_per_category() {
        let sheet = cube_metadata(SceneUnit::Meter, MaterialCategory::Sheet);
        assert_relative_eq!(sheet.calculation_value(), 6.0);
        assert_eq!(sheet.calculation_unit(), CalculationUnit::SquareMeters);

        let volume = cube_metadata(SceneUnit::Meter, MaterialCategory::Volume);
        assert_relative_eq!(volume.calculation_value(), 1.0);
        assert_eq!(volume.calculation_unit(), CalculationUnit::CubicMeters);

        let linear = cube_metadata(SceneUnit::Centimeter, MaterialCategory::Linear);
        assert_relative_eq!(linear.calculation_value(), 10.0);
        assert_eq!(linear.calculation_unit(), CalculationUnit::Millimeters);

        let unit = cube_metadata(SceneUnit::Millimeter, MaterialCategory::Unit);
        assert_relative_eq!(unit.calculation_value(), 1.0);
        assert_eq!(unit.calculation_unit(), CalculationUnit::Units);
    }

    #[test]
    fn test_reassign_keeps_value_and_unit_consistent() {
        let mut store = MetadataStore::new();
        let id = NodeId::from("part");
        store.insert_part(id.clone(), cube_metadata(SceneUnit::Millimeter, MaterialCategory::Unit));

        let value = store.reassign_material(&id, MaterialCategory::Sheet).unwrap();
        assert_relative_eq!(value, 6.0e-6);
        let part = store.part(&id).unwrap();
        assert_eq!(part.material_type(), MaterialCategory::Sheet);
        assert_eq!(part.calculation_unit(), CalculationUnit::SquareMeters);

        assert!(store.reassign_material(&NodeId::from("missing"), MaterialCategory::Sheet).is_none());
    }

    #[test]
    fn test_group_value_is_square_meters() {
        let group = GroupMetadata::new(2_000_000.0, 5.0, 3, SceneUnit::Millimeter, MaterialCategory::Linear);
        assert_relative_eq!(group.calculation_value, 2.0);
        assert_eq!(group.calculation_unit, CalculationUnit::SquareMeters);
        assert_eq!(group.material_type, MaterialCategory::Linear);
    }

    #[test]
    fn test_store_counts_and_clear() {
        let mut store = MetadataStore::new();
        assert!(store.is_empty());
        store.insert_part(NodeId::from("a"), cube_metadata(SceneUnit::Meter, MaterialCategory::Volume));
        store.insert_group(
            NodeId::from("g"),
            GroupMetadata::new(6.0, 1.0, 1, SceneUnit::Meter, MaterialCategory::Sheet),
        );
        assert_eq!(store.part_count(), 1);
        assert_eq!(store.group_count(), 1);
        assert_eq!(store.len(), 2);
        store.clear();
        assert!(store.is_empty());
    }
}
