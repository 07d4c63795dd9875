// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangle mesh geometry: a vertex position buffer with an optional index buffer

use super::BoundingBox;
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Vertex positions plus optional triangle indices.
///
/// Without indices every three consecutive positions form one triangle.
/// With indices every three consecutive indices reference one triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshGeometry {
    pub positions: Vec<Point3<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<u32>>,
}

impl MeshGeometry {
    pub fn new(positions: Vec<Point3<f64>>, indices: Option<Vec<u32>>) -> Self {
        Self { positions, indices }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn indexed(positions: Vec<Point3<f64>>, indices: Vec<u32>) -> Self {
        Self::new(positions, Some(indices))
    }

    pub fn non_indexed(positions: Vec<Point3<f64>>) -> Self {
        Self::new(positions, None)
    }

    /// Build from a flat `[x, y, z, x, y, z, ...]` buffer. A trailing partial
    /// coordinate triple is dropped.
    pub fn from_flat(coords: &[f64], indices: Option<Vec<u32>>) -> Self {
        let positions = coords
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Self::new(positions, indices)
    }

    /// True when there is no position data at all
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of complete triangles described by the buffers
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Iterate over triangle corner positions.
    ///
    /// Index triples that reference a missing vertex are skipped.
    pub fn triangles(&self) -> Triangles<'_> {
        Triangles {
            positions: &self.positions,
            indices: self.indices.as_deref(),
            cursor: 0,
        }
    }

    /// Expand an indexed geometry into a triangle soup
    pub fn to_non_indexed(&self) -> Self {
        let mut positions = Vec::with_capacity(self.triangle_count() * 3);
        for [a, b, c] in self.triangles() {
            positions.extend_from_slice(&[a, b, c]);
        }
        Self::non_indexed(positions)
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.positions)
    }

    pub fn translate(&mut self, offset: &Vector3<f64>) {
        for position in &mut self.positions {
            *position += offset;
        }
    }

    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        for position in &mut self.positions {
            *position = matrix.transform_point(position);
        }
    }
}

/// Iterator over the triangles of a [`MeshGeometry`]
pub struct Triangles<'a> {
    positions: &'a [Point3<f64>],
    indices: Option<&'a [u32]>,
    cursor: usize,
}

impl<'a> Iterator for Triangles<'a> {
    type Item = [Point3<f64>; 3];

    fn next(&mut self) -> Option<Self::Item> {
        let positions = self.positions;
        loop {
            let start = self.cursor;
            self.cursor += 3;

            match self.indices {
                Some(indices) => {
                    let tri = indices.get(start..start + 3)?;
                    let corner = |i: u32| positions.get(i as usize).copied();
                    if let (Some(a), Some(b), Some(c)) =
                        (corner(tri[0]), corner(tri[1]), corner(tri[2]))
                    {
                        return Some([a, b, c]);
                    }
                }
                None => {
                    let tri = positions.get(start..start + 3)?;
                    return Some([tri[0], tri[1], tri[2]]);
                }
            }
        }
    }
}
