// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Identity allocation across loaded models
//!
//! Ids come from file stems and explicit ids in scene files, so two sources
//! can hand out the same one. Metadata is keyed by id, so every node must
//! carry an id no other loaded node has.

use super::{NodeId, NodeKind, SceneNode};
use ahash::AHashSet;

/// Ids handed out so far
#[derive(Debug, Default)]
pub struct UniqueIds {
    seen: AHashSet<NodeId>,
}

impl UniqueIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.seen.contains(id)
    }

    /// Claim every id in `models`, renaming nodes whose id is already taken
    /// to `"{id}~{n}"`. Returns the number of renamed nodes.
    pub fn assign(&mut self, models: &mut [SceneNode]) -> usize {
        let renamed = models.iter_mut().map(|model| self.visit(model)).sum();
        if renamed > 0 {
            tracing::warn!("Renamed {} nodes with duplicate ids", renamed);
        }
        renamed
    }

    fn visit(&mut self, node: &mut SceneNode) -> usize {
        let mut renamed = 0;

        if self.seen.contains(&node.id) {
            let fresh = (1..)
                .map(|n| NodeId::new(format!("{}~{}", node.id, n)))
                .find(|candidate| !self.seen.contains(candidate))
                .unwrap_or_else(|| node.id.clone());
            tracing::debug!("Duplicate id {} renamed to {}", node.id, fresh);
            node.id = fresh;
            renamed += 1;
        }
        self.seen.insert(node.id.clone());

        if let NodeKind::Group { children } = &mut node.kind {
            for child in children {
                renamed += self.visit(child);
            }
        }
        renamed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MeshGeometry;

    fn bracket() -> SceneNode {
        SceneNode::group(
            "bracket",
            "bracket",
            vec![SceneNode::part("bracket/0", "bracket", MeshGeometry::empty())],
        )
    }

    #[test]
    fn test_unique_models_are_untouched() {
        let mut models = vec![bracket(), SceneNode::helper("lamp", "Lamp")];
        let before = models.clone();
        assert_eq!(UniqueIds::new().assign(&mut models), 0);
        assert_eq!(models, before);
    }

    #[test]
    fn test_duplicates_across_calls() {
        let mut ids = UniqueIds::new();
        let mut first = vec![bracket()];
        let mut second = vec![bracket()];
        let mut third = vec![bracket()];

        ids.assign(&mut first);
        assert_eq!(ids.assign(&mut second), 2);
        assert_eq!(ids.assign(&mut third), 2);

        assert_eq!(first[0].id.as_str(), "bracket");
        assert_eq!(second[0].id.as_str(), "bracket~1");
        assert_eq!(second[0].children()[0].id.as_str(), "bracket/0~1");
        assert_eq!(third[0].id.as_str(), "bracket~2");
        assert!(ids.contains(&NodeId::from("bracket/0~2")));
    }

    #[test]
    fn test_duplicate_siblings() {
        let mut models = vec![SceneNode::group(
            "root",
            "Root",
            vec![
                SceneNode::part("leg", "Leg", MeshGeometry::empty()),
                SceneNode::part("leg", "Leg", MeshGeometry::empty()),
            ],
        )];
        assert_eq!(UniqueIds::new().assign(&mut models), 1);
        let ids: Vec<_> = models[0].children().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["leg", "leg~1"]);
    }
}
