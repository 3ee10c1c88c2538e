//! Procedural box, cylinder and cone geometry.
//!
//! All generators return a centred [`MeshData`] with counter-clockwise,
//! outward facing triangles and material index 0.

use std::f32::consts::PI;

use crate::data_structures::model::{MeshData, ModelVertex};

/// Axis aligned box of `width` × `height` × `depth`, one quad per side.
pub fn cuboid(name: &str, width: f32, height: f32, depth: f32) -> MeshData {
    let half = [width / 2.0, height / 2.0, depth / 2.0];
    // (normal, u, v) with u × v = normal
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let corners = [(-1.0, -1.0, [0.0, 1.0]), (1.0, -1.0, [1.0, 1.0]), (1.0, 1.0, [1.0, 0.0]), (-1.0, 1.0, [0.0, 0.0])];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces {
        let base = vertices.len() as u32;
        for (su, sv, tex_coords) in corners {
            let position = [0, 1, 2].map(|i| (normal[i] + u[i] * su + v[i] * sv) * half[i]);
            vertices.push(ModelVertex::new(position, normal, tex_coords));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData {
        name: name.to_string(),
        vertices,
        indices,
        material: 0,
    }
}

/// Capped cylinder around the Y axis. A `radius_top` of 0 makes a cone.
pub fn cylinder(name: &str, radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> MeshData {
    let segments = radial_segments.max(3);
    let half_height = height / 2.0;
    let mut mesh = MeshData {
        name: name.to_string(),
        ..Default::default()
    };

    // Side, top ring first
    let slope = (radius_bottom - radius_top) / height;
    for (row, radius) in [radius_top, radius_bottom].into_iter().enumerate() {
        let v = row as f32;
        let y = half_height - v * height;
        for x in 0..=segments {
            let u = x as f32 / segments as f32;
            let (sin, cos) = (u * 2.0 * PI).sin_cos();
            let len = (sin * sin + slope * slope + cos * cos).sqrt();
            mesh.vertices.push(ModelVertex::new(
                [radius * sin, y, radius * cos],
                [sin / len, slope / len, cos / len],
                [u, 1.0 - v],
            ));
        }
    }
    let stride = segments + 1;
    for x in 0..segments {
        let a = x;
        let b = stride + x;
        let c = stride + x + 1;
        let d = x + 1;
        mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    if radius_top > 0.0 {
        cap(&mut mesh, radius_top, half_height, segments, true);
    }
    if radius_bottom > 0.0 {
        cap(&mut mesh, radius_bottom, half_height, segments, false);
    }
    mesh
}

/// Cone around the Y axis with its apex at `height / 2`.
pub fn cone(name: &str, radius: f32, height: f32, radial_segments: u32) -> MeshData {
    cylinder(name, 0.0, radius, height, radial_segments)
}

fn cap(mesh: &mut MeshData, radius: f32, half_height: f32, segments: u32, top: bool) {
    let sign = if top { 1.0 } else { -1.0 };
    let y = sign * half_height;
    let normal = [0.0, sign, 0.0];

    let center = mesh.vertices.len() as u32;
    mesh.vertices.push(ModelVertex::new([0.0, y, 0.0], normal, [0.5, 0.5]));
    let first = mesh.vertices.len() as u32;
    for x in 0..=segments {
        let (sin, cos) = (x as f32 / segments as f32 * 2.0 * PI).sin_cos();
        mesh.vertices.push(ModelVertex::new(
            [radius * sin, y, radius * cos],
            normal,
            [cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5],
        ));
    }
    for x in 0..segments {
        let i = first + x;
        if top {
            mesh.indices.extend_from_slice(&[i, i + 1, center]);
        } else {
            mesh.indices.extend_from_slice(&[i + 1, i, center]);
        }
    }
}
