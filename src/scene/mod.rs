// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene graph: groups, parts and helpers with stable identities

mod ids;
mod node;

pub use ids::UniqueIds;
pub use node::{Descendants, NodeId, NodeKind, SceneNode};
