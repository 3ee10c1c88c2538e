use cgmath::InnerSpace;

use crate::data_structures::model::{MeshData, ModelVertex};

/**
 * Converts parsed OBJ models into meshes.
 *
 * OBJ files don't always come with normals. Meshes without them are split into
 * one vertex per triangle corner so every face can carry its own flat normal.
 */
pub fn load_meshes(models: &[tobj::Model], file_name: &str) -> Vec<MeshData> {
    models
        .iter()
        .filter_map(|m| {
            if m.mesh.indices.is_empty() {
                log::warn!("Mesh {:?} in file {} has no faces and is skipped.", m.name, file_name);
                return None;
            }
            let vertices = (0..m.mesh.positions.len() / 3)
                .map(|i| ModelVertex {
                    position: [
                        m.mesh.positions[i * 3],
                        m.mesh.positions[i * 3 + 1],
                        m.mesh.positions[i * 3 + 2],
                    ],
                    tex_coords: [
                        m.mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                        1.0 - m.mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                    ],
                    normal: [
                        m.mesh.normals.get(i * 3).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 1).map_or(0.0, |f| *f),
                        m.mesh.normals.get(i * 3 + 2).map_or(0.0, |f| *f),
                    ],
                })
                .collect::<Vec<_>>();

            let mut mesh = MeshData {
                name: if m.name.is_empty() {
                    file_name.to_string()
                } else {
                    m.name.clone()
                },
                vertices,
                indices: m.mesh.indices.clone(),
                material: m.mesh.material_id.unwrap_or(0),
            };
            if m.mesh.normals.is_empty() {
                flat_shade(&mut mesh);
            }
            Some(mesh)
        })
        .collect()
}

/// Give every triangle its own three vertices carrying the face normal.
pub fn flat_shade(mesh: &mut MeshData) {
    let mut vertices = Vec::with_capacity(mesh.indices.len());
    for c in mesh.indices.chunks_exact(3) {
        let Some(corners) = c
            .iter()
            .map(|&i| mesh.vertices.get(i as usize).copied())
            .collect::<Option<Vec<_>>>()
        else {
            log::warn!("Mesh {} references a vertex out of range.", mesh.name);
            continue;
        };
        let pos0: cgmath::Vector3<f32> = corners[0].position.into();
        let pos1: cgmath::Vector3<f32> = corners[1].position.into();
        let pos2: cgmath::Vector3<f32> = corners[2].position.into();
        let cross = (pos1 - pos0).cross(pos2 - pos0);
        let normal = if cross.magnitude2() > 0.0 {
            cross.normalize().into()
        } else {
            [0.0, 1.0, 0.0]
        };
        vertices.extend(corners.into_iter().map(|v| ModelVertex { normal, ..v }));
    }
    mesh.indices = (0..vertices.len() as u32).collect();
    mesh.vertices = vertices;
}
