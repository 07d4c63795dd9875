// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-geometry measurements: surface area, bounding box and volume estimate
//!
//! All values are in raw scene units. Unit conversion happens later, in
//! [`crate::units`], at the point each derived value is produced.

use super::{BoundingBox, MeshGeometry};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Raw measurements of one geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryMetrics {
    /// Total surface area in square scene units
    pub area: f64,
    /// Bounding-box volume in cubic scene units
    pub volume: f64,
    pub bbox: Option<BoundingBox>,
    pub vertex_count: usize,
    pub triangle_count: usize,
}

impl GeometryMetrics {
    /// Metrics of a geometry without position data
    pub fn empty() -> Self {
        Self {
            area: 0.0,
            volume: 0.0,
            bbox: None,
            vertex_count: 0,
            triangle_count: 0,
        }
    }

    /// Measure a geometry in a single call
    pub fn measure(geometry: &MeshGeometry) -> Self {
        if geometry.is_empty() {
            return Self::empty();
        }

        let bbox = bounding_box(geometry);
        Self {
            area: surface_area(geometry),
            volume: bbox.map(|b| b.volume()).unwrap_or(0.0),
            bbox,
            vertex_count: geometry.vertex_count(),
            triangle_count: geometry.triangle_count(),
        }
    }
}

/// Sum of triangle areas.
///
/// Each triangle (A, B, C) contributes `|(C - B) x (A - B)| / 2`.
pub fn surface_area(geometry: &MeshGeometry) -> f64 {
    geometry
        .triangles()
        .map(|[a, b, c]| triangle_area(&a, &b, &c))
        .sum()
}

pub fn triangle_area(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let cb = c - b;
    let ab = a - b;
    cb.cross(&ab).norm() / 2.0
}

/// Axis-aligned bounds of every vertex position
pub fn bounding_box(geometry: &MeshGeometry) -> Option<BoundingBox> {
    geometry.bounding_box()
}

/// Product of the bounding-box extents.
///
/// This is an upper bound of the enclosed volume, not the true mesh volume.
pub fn volume_estimate(geometry: &MeshGeometry) -> f64 {
    bounding_box(geometry).map(|b| b.volume()).unwrap_or(0.0)
}
