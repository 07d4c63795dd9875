// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Serializable snapshot of a scan, used for JSON export

use super::aggregate::MaterialReport;
use super::store::{GroupMetadata, MetadataStore, PartMetadata};
use crate::scene::{NodeId, SceneNode};
use crate::units::SceneUnit;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartEntry {
    pub id: NodeId,
    pub name: String,
    #[serde(flatten)]
    pub metadata: PartMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    pub id: NodeId,
    pub name: String,
    pub totals: Option<GroupMetadata>,
    pub parts: Vec<PartEntry>,
}

impl ModelReport {
    pub fn collect(model: &SceneNode, store: &MetadataStore) -> Self {
        let parts = model
            .parts()
            .filter_map(|(node, _)| {
                store.part(&node.id).map(|metadata| PartEntry {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    metadata: metadata.clone(),
                })
            })
            .collect();

        Self {
            id: model.id.clone(),
            name: model.name.clone(),
            totals: store.group(&model.id).cloned(),
            parts,
        }
    }
}

/// Everything produced by scanning and aggregating a set of models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub version: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub unit: SceneUnit,
    pub models: Vec<ModelReport>,
    pub materials: MaterialReport,
}

impl ScanReport {
    pub fn new(
        unit: SceneUnit,
        models: &[SceneNode],
        store: &MetadataStore,
        materials: MaterialReport,
    ) -> Self {
        Self {
            version: crate::VERSION.to_string(),
            generated_at: chrono::Utc::now(),
            unit,
            models: models
                .iter()
                .map(|model| ModelReport::collect(model, store))
                .collect(),
            materials,
        }
    }

    pub fn part_count(&self) -> usize {
        self.models.iter().map(|model| model.parts.len()).sum()
    }
}
