// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL import and export

use crate::geometry::MeshGeometry;
use crate::scene::{NodeId, SceneNode};
use nalgebra::{Point3, Vector3};
use std::io::{Read, Seek, Write};

/// Read an ASCII or binary STL into an indexed geometry
pub fn read_geometry<R: Read + Seek>(reader: &mut R) -> std::io::Result<MeshGeometry> {
    let stl = stl_io::read_stl(reader)?;

    let positions = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();

    let mut indices = Vec::with_capacity(stl.faces.len() * 3);
    for face in &stl.faces {
        indices.extend(face.vertices.iter().map(|&i| i as u32));
    }

    Ok(MeshGeometry::indexed(positions, indices))
}

/// One model per STL file: a group named after the file holding one part
pub fn model_from_geometry(id: NodeId, name: &str, geometry: MeshGeometry) -> SceneNode {
    let part = SceneNode::part(id.child(0), name, geometry);
    SceneNode::group(id, name, vec![part])
}

/// Write a geometry as binary STL
pub fn write_geometry<W: Write>(writer: &mut W, geometry: &MeshGeometry) -> std::io::Result<()> {
    use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

    let vertex = |p: &Point3<f64>| StlVertex::new([p.x as f32, p.y as f32, p.z as f32]);

    let triangles: Vec<StlTriangle> = geometry
        .triangles()
        .map(|[a, b, c]| {
            let normal = (b - a).cross(&(c - a)).try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros);
            StlTriangle {
                normal: Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]),
                vertices: [vertex(&a), vertex(&b), vertex(&c)],
            }
        })
        .collect();

    stl_io::write_stl(writer, triangles.iter())
}
