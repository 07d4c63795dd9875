// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh buffers, measurements and ray casting

mod bbox;
mod mesh;
pub mod metrics;
mod primitives;
mod raycast;

pub use bbox::BoundingBox;
pub use mesh::{MeshGeometry, Triangles};
pub use metrics::{bounding_box, surface_area, volume_estimate, GeometryMetrics};
pub use primitives::Primitive;
pub use raycast::Ray;
