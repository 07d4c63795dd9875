// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! JSON scene files
//!
//! ```json
//! {
//!   "unit": "mm",
//!   "models": [
//!     { "name": "Cabinet", "children": [
//!       { "name": "Door", "positions": [0, 0, 0, 1, 0, 0, 0, 1, 0], "indices": [0, 1, 2] },
//!       { "name": "Lamp", "helper": true }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Positions are flat `x, y, z` triples. Nodes without an `id` get one derived
//! from their position in the tree.

use crate::geometry::MeshGeometry;
use crate::scene::{NodeId, SceneNode, UniqueIds};
use crate::units::SceneUnit;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub models: Vec<NodeRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeRecord>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub helper: bool,
}

/// Models read from one source, with the unit the source declared
#[derive(Debug, Clone, Default)]
pub struct LoadedScene {
    pub unit: Option<SceneUnit>,
    pub models: Vec<SceneNode>,
}

impl SceneFile {
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Convert to scene nodes. `prefix` seeds the ids of models without one;
    /// repeated explicit ids are renamed.
    pub fn into_scene(self, prefix: &str) -> LoadedScene {
        let unit = self.unit.as_deref().map(SceneUnit::parse_lenient);
        let mut models: Vec<SceneNode> = self
            .models
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let fallback = if index == 0 {
                    NodeId::new(prefix)
                } else {
                    NodeId::new(format!("{}#{}", prefix, index))
                };
                record.into_node(fallback)
            })
            .collect();
        UniqueIds::new().assign(&mut models);
        LoadedScene { unit, models }
    }
}

impl NodeRecord {
    fn into_node(self, fallback: NodeId) -> SceneNode {
        let id = self.id.map(NodeId::from).unwrap_or(fallback);

        if self.helper {
            return SceneNode::helper(id, self.name);
        }

        let geometry = self
            .positions
            .map(|coords| MeshGeometry::from_flat(&coords, self.indices));

        let children: Vec<SceneNode> = self
            .children
            .into_iter()
            .enumerate()
            .map(|(index, child)| child.into_node(id.child(index)))
            .collect();

        match (geometry, children.is_empty()) {
            (Some(geometry), true) => SceneNode::part(id, self.name, geometry),
            // a mesh with children is split into a group holding the mesh
            (Some(geometry), false) => {
                let part = SceneNode::part(
                    NodeId::new(format!("{}#mesh", id)),
                    self.name.clone(),
                    geometry,
                );
                let mut nodes = Vec::with_capacity(children.len() + 1);
                nodes.push(part);
                nodes.extend(children);
                SceneNode::group(id, self.name, nodes)
            }
            (None, _) => SceneNode::group(id, self.name, children),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "unit": "cm",
        "models": [
            { "name": "Cabinet", "children": [
                { "name": "Door", "positions": [0,0,0, 1,0,0, 0,1,0], "indices": [0,1,2] },
                { "id": "lamp", "name": "Lamp", "helper": true },
                { "name": "Frame", "positions": [0,0,0, 2,0,0, 0,2,0], "children": [
                    { "name": "Rail", "positions": [0,0,0, 1,0,0, 0,0,1] }
                ] }
            ] },
            { "name": "Loose", "positions": [0,0,0, 1,0,0, 0,1,0] }
        ]
    }"#;

    #[test]
    fn test_parse_scene_file() {
        let scene = SceneFile::from_json(SAMPLE).unwrap().into_scene("sample");
        assert_eq!(scene.unit, Some(SceneUnit::Centimeter));
        assert_eq!(scene.models.len(), 2);

        let cabinet = &scene.models[0];
        assert_eq!(cabinet.id.as_str(), "sample");
        assert!(cabinet.is_group());
        assert_eq!(cabinet.children()[0].id.as_str(), "sample/0");
        assert!(cabinet.children()[0].is_part());
        assert_eq!(cabinet.children()[1].id.as_str(), "lamp");
        assert_eq!(scene.models[1].id.as_str(), "sample#1");
        assert!(scene.models[1].is_part());
    }

    #[test]
    fn test_mesh_with_children_becomes_group() {
        let scene = SceneFile::from_json(SAMPLE).unwrap().into_scene("sample");
        let frame = &scene.models[0].children()[2];
        assert!(frame.is_group());
        let ids: Vec<_> = frame.children().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["sample/2#mesh", "sample/2/0"]);
        assert_eq!(scene.models[0].part_count(), 3);
    }

    #[test]
    fn test_repeated_explicit_ids_are_renamed() {
        let scene = SceneFile::from_json(
            r#"{ "models": [
                { "id": "leg", "positions": [0,0,0, 1,0,0, 0,1,0] },
                { "id": "leg", "positions": [0,0,0, 2,0,0, 0,2,0] }
            ] }"#,
        )
        .unwrap()
        .into_scene("table");
        let ids: Vec<_> = scene.models.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["leg", "leg~1"]);
    }

    #[test]
    fn test_unknown_unit_falls_back_to_millimeters() {
        let scene = SceneFile::from_json(r#"{ "unit": "inch", "models": [] }"#)
            .unwrap()
            .into_scene("x");
        assert_eq!(scene.unit, Some(SceneUnit::Millimeter));
    }
}
