// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene graph node definitions

use crate::geometry::MeshGeometry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a node within a loaded model
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Child identity derived from this one, e.g. `model/2`
    pub fn child(&self, segment: impl fmt::Display) -> Self {
        Self(format!("{}/{}", self.0, segment))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A node of the scene graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Types of scene nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    /// Container of nested groups and parts
    Group { children: Vec<SceneNode> },
    /// Drawable triangle mesh
    Part { geometry: MeshGeometry },
    /// Non-drawable leaf (light, camera, marker)
    Helper,
}

impl SceneNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    pub fn group(id: impl Into<NodeId>, name: impl Into<String>, children: Vec<SceneNode>) -> Self {
        Self::new(id, name, NodeKind::Group { children })
    }

    pub fn part(id: impl Into<NodeId>, name: impl Into<String>, geometry: MeshGeometry) -> Self {
        Self::new(id, name, NodeKind::Part { geometry })
    }

    pub fn helper(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self::new(id, name, NodeKind::Helper)
    }

    pub fn is_part(&self) -> bool {
        matches!(self.kind, NodeKind::Part { .. })
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group { .. })
    }

    pub fn geometry(&self) -> Option<&MeshGeometry> {
        match &self.kind {
            NodeKind::Part { geometry } => Some(geometry),
            _ => None,
        }
    }

    pub fn children(&self) -> &[SceneNode] {
        match &self.kind {
            NodeKind::Group { children } => children,
            _ => &[],
        }
    }

    /// Depth-first, pre-order walk starting with this node
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Every part in the subtree, this node included
    pub fn parts(&self) -> impl Iterator<Item = (&SceneNode, &MeshGeometry)> {
        self.descendants()
            .filter_map(|node| node.geometry().map(|geometry| (node, geometry)))
    }

    pub fn traverse(&self, visit: &mut impl FnMut(&SceneNode)) {
        visit(self);
        for child in self.children() {
            child.traverse(visit);
        }
    }

    pub fn find(&self, id: &NodeId) -> Option<&SceneNode> {
        self.descendants().find(|node| &node.id == id)
    }

    pub fn part_count(&self) -> usize {
        self.parts().count()
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    stack: Vec<&'a SceneNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SceneNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}
