// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric primitives generator

use super::MeshGeometry;
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

/// Geometric primitives
pub enum Primitive {
    Cuboid { size: Vector3<f64>, center: bool },
    Cylinder { h: f64, r: f64, segments: u32 },
}

impl Primitive {
    pub fn cuboid(size: Vector3<f64>, center: bool) -> Self {
        Self::Cuboid { size, center }
    }

    /// Cylinder along +Z starting at the origin
    pub fn cylinder(h: f64, r: f64, segments: u32) -> Self {
        let segments = if segments >= 3 { segments } else { 32 };
        Self::Cylinder { h, r, segments }
    }

    /// Indexed geometry for the primitive
    pub fn to_geometry(&self) -> MeshGeometry {
        match self {
            Self::Cuboid { size, center } => generate_cuboid(*size, *center),
            Self::Cylinder { h, r, segments } => generate_cylinder(*h, *r, *segments),
        }
    }
}

fn generate_cuboid(size: Vector3<f64>, center: bool) -> MeshGeometry {
    let min = if center { -size / 2.0 } else { Vector3::zeros() };
    let max = min + size;

    // 8 corners
    let positions = vec![
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];

    // 6 faces, 2 triangles each
    let indices = vec![
        4, 5, 6, 4, 6, 7, // front (z+)
        1, 0, 3, 1, 3, 2, // back (z-)
        5, 1, 2, 5, 2, 6, // right (x+)
        0, 4, 7, 0, 7, 3, // left (x-)
        7, 6, 2, 7, 2, 3, // top (y+)
        0, 1, 5, 0, 5, 4, // bottom (y-)
    ];

    MeshGeometry::indexed(positions, indices)
}

fn generate_cylinder(h: f64, r: f64, segments: u32) -> MeshGeometry {
    let mut positions = Vec::with_capacity(2 * segments as usize + 2);
    positions.push(Point3::new(0.0, 0.0, 0.0));
    positions.push(Point3::new(0.0, 0.0, h));

    for i in 0..segments {
        let angle = 2.0 * PI * i as f64 / segments as f64;
        let (x, y) = (r * angle.cos(), r * angle.sin());
        positions.push(Point3::new(x, y, 0.0));
        positions.push(Point3::new(x, y, h));
    }

    let mut indices = Vec::with_capacity(segments as usize * 12);
    for i in 0..segments {
        let j = (i + 1) % segments;
        let (b0, t0) = (2 + 2 * i, 3 + 2 * i);
        let (b1, t1) = (2 + 2 * j, 3 + 2 * j);

        indices.extend_from_slice(&[0, b1, b0]);
        indices.extend_from_slice(&[1, t0, t1]);
        indices.extend_from_slice(&[b0, b1, t1]);
        indices.extend_from_slice(&[b0, t1, t0]);
    }

    MeshGeometry::indexed(positions, indices)
}
