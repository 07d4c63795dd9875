// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene walker that measures, classifies and records every part

use super::store::{GroupMetadata, MetadataStore, PartMetadata};
use crate::config::MeshtallyConfig;
use crate::geometry::GeometryMetrics;
use crate::materials::{MaterialCategory, MaterialClassifier, MaterialRegistry};
use crate::scene::{NodeKind, SceneNode};
use crate::units::{Dimensions, SceneUnit};

/// Raw sums carried up the tree during a scan
#[derive(Debug, Clone, Copy, Default)]
struct Subtotal {
    area: f64,
    volume: f64,
    parts: usize,
}

impl std::ops::AddAssign for Subtotal {
    fn add_assign(&mut self, other: Self) {
        self.area += other.area;
        self.volume += other.volume;
        self.parts += other.parts;
    }
}

#[derive(Debug, Clone)]
pub struct Scanner {
    unit: SceneUnit,
    registry: MaterialRegistry,
    default_material: MaterialCategory,
    classifier: MaterialClassifier,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(SceneUnit::default())
    }
}

impl Scanner {
    pub fn new(unit: SceneUnit) -> Self {
        Self {
            unit,
            registry: MaterialRegistry::default(),
            default_material: MaterialCategory::Sheet,
            classifier: MaterialClassifier::default(),
        }
    }

    pub fn from_config(config: &MeshtallyConfig) -> Self {
        Self {
            unit: config.unit,
            registry: config.materials.clone(),
            default_material: config.default_material,
            classifier: MaterialClassifier::new(config.classifier.clone()),
        }
    }

    pub fn with_unit(mut self, unit: SceneUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_registry(mut self, registry: MaterialRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_default_material(mut self, category: MaterialCategory) -> Self {
        self.default_material = category;
        self
    }

    pub fn with_classifier(mut self, classifier: MaterialClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn unit(&self) -> SceneUnit {
        self.unit
    }

    pub fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    pub fn default_material(&self) -> MaterialCategory {
        self.default_material
    }

    pub fn classifier(&self) -> &MaterialClassifier {
        &self.classifier
    }

    /// Measure every part under `root` and record the results in `store`.
    ///
    /// Every group in the subtree receives totals over its descendant parts.
    /// The root always receives a group entry, even when it is itself a part,
    /// and a copy of that entry is returned.
    pub fn scan(&self, root: &SceneNode, store: &mut MetadataStore) -> GroupMetadata {
        let totals = self.visit(root, store);

        if !root.is_group() {
            let entry = self.group_entry(root, totals, store);
            store.insert_group(root.id.clone(), entry);
        }

        let summary = match store.group(&root.id) {
            Some(entry) => entry.clone(),
            None => self.group_entry(root, totals, store),
        };

        tracing::info!(
            "Scan complete for '{}': {} parts, {:.6} m²",
            display_name(root),
            summary.part_count,
            summary.calculation_value
        );
        summary
    }

    /// Scan several top-level models into one store
    pub fn scan_all(&self, models: &[SceneNode], store: &mut MetadataStore) -> Vec<GroupMetadata> {
        models.iter().map(|model| self.scan(model, store)).collect()
    }

    fn visit(&self, node: &SceneNode, store: &mut MetadataStore) -> Subtotal {
        match &node.kind {
            NodeKind::Part { geometry } => {
                let metrics = GeometryMetrics::measure(geometry);
                let part = self.measure_part(node, &metrics, store);
                tracing::debug!(
                    "{} '{}': {} → {:.6} {}",
                    node.id,
                    node.name,
                    part.material_type(),
                    part.calculation_value(),
                    part.calculation_unit()
                );
                store.insert_part(node.id.clone(), part);
                Subtotal {
                    area: metrics.area,
                    volume: metrics.volume,
                    parts: 1,
                }
            }
            NodeKind::Group { children } => {
                let mut totals = Subtotal::default();
                for child in children {
                    totals += self.visit(child, store);
                }
                let entry = self.group_entry(node, totals, store);
                store.insert_group(node.id.clone(), entry);
                totals
            }
            NodeKind::Helper => Subtotal::default(),
        }
    }

    fn measure_part(
        &self,
        node: &SceneNode,
        metrics: &GeometryMetrics,
        store: &MetadataStore,
    ) -> PartMetadata {
        let dimensions = metrics
            .bbox
            .as_ref()
            .map(|bbox| Dimensions::from_extents(&bbox.size(), self.unit))
            .unwrap_or_else(Dimensions::zero);

        let category = self
            .classifier
            .classify(&node.name, &dimensions)
            .or_else(|| store.part(&node.id).map(PartMetadata::material_type))
            .unwrap_or(self.default_material);

        PartMetadata::new(
            metrics.area,
            metrics.volume,
            dimensions,
            self.unit,
            metrics.triangle_count,
            category,
        )
    }

    fn group_entry(&self, node: &SceneNode, totals: Subtotal, store: &MetadataStore) -> GroupMetadata {
        let material_type = store
            .group(&node.id)
            .map(|group| group.material_type)
            .unwrap_or(self.default_material);
        GroupMetadata::new(totals.area, totals.volume, totals.parts, self.unit, material_type)
    }
}

fn display_name(node: &SceneNode) -> &str {
    if node.name.is_empty() {
        node.id.as_str()
    } else {
        &node.name
    }
}
