// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Ray casting against triangle geometry

use super::{BoundingBox, MeshGeometry};
use nalgebra::{Point3, Vector3};

const EPS: f64 = 1e-9;

/// A ray in world space with a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Create a ray; the direction is normalized. A zero direction yields a
    /// ray that never hits anything.
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        let direction = direction.try_normalize(EPS).unwrap_or_else(Vector3::zeros);
        Self { origin, direction }
    }

    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// Slab test. Returns the entry distance (or exit distance when the
    /// origin is inside the box).
    pub fn intersect_aabb(&self, bbox: &BoundingBox) -> Option<f64> {
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let dir = self.direction[axis];
            if dir.abs() < EPS {
                if origin < bbox.min[axis] || origin > bbox.max[axis] {
                    return None;
                }
                continue;
            }
            let t1 = (bbox.min[axis] - origin) / dir;
            let t2 = (bbox.max[axis] - origin) / dir;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }

        if t_max < 0.0 || t_min > t_max {
            return None;
        }
        Some(if t_min < 0.0 { t_max } else { t_min })
    }

    /// Möller–Trumbore intersection; returns the forward hit distance
    pub fn intersect_triangle(
        &self,
        v0: &Point3<f64>,
        v1: &Point3<f64>,
        v2: &Point3<f64>,
    ) -> Option<f64> {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let h = self.direction.cross(&edge2);
        let a = edge1.dot(&h);

        if a.abs() < EPS {
            return None; // Ray parallel to triangle
        }

        let f = 1.0 / a;
        let s = self.origin - v0;
        let u = f * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = f * self.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(&q);
        (t > EPS).then_some(t)
    }

    /// Nearest forward hit against any triangle of the geometry
    pub fn intersect_geometry(&self, geometry: &MeshGeometry) -> Option<f64> {
        let bbox = geometry.bounding_box()?;
        self.intersect_aabb(&bbox)?;

        geometry
            .triangles()
            .filter_map(|[a, b, c]| self.intersect_triangle(&a, &b, &c))
            .min_by(|a, b| a.total_cmp(b))
    }
}
