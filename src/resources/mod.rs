use std::io::{BufReader, Cursor};

use anyhow::Context;

use crate::data_structures::model::{self, MaterialDescriptor, MeshData};

/**
 * This module contains all logic for loading meshes, materials and textures from external files.
 *
 * Loading is split in two: [`load_obj`] does all the I/O and parsing without a GPU,
 * [`CpuAsset::upload`] turns the result into a [`model::Model`].
 */
pub mod materials;
pub mod mesh;
pub mod source;
pub mod texture;

pub use source::{AssetSource, ResourceDir};

/// A material and the bytes of its diffuse map, if it has one that could be fetched.
#[derive(Debug, Clone)]
pub struct MaterialData {
    pub descriptor: MaterialDescriptor,
    pub diffuse_image: Option<Vec<u8>>,
}

/// A parsed model that has not been uploaded yet.
#[derive(Debug, Clone)]
pub struct CpuAsset {
    pub meshes: Vec<MeshData>,
    pub materials: Vec<MaterialData>,
}

impl CpuAsset {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(MeshData::triangle_count).sum()
    }

    pub fn upload(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) -> model::Model {
        let materials = self
            .materials
            .iter()
            .map(|m| {
                let texture = texture::diffuse_texture(
                    device,
                    queue,
                    m.descriptor.diffuse_texture.as_deref(),
                    m.diffuse_image.as_deref(),
                );
                model::Material::new(device, &m.descriptor, texture, layout)
            })
            .collect();
        let meshes = self.meshes.iter().map(|m| m.upload(device)).collect();
        model::Model { meshes, materials }
    }
}

impl From<(Vec<MeshData>, Vec<MaterialDescriptor>)> for CpuAsset {
    fn from((meshes, materials): (Vec<MeshData>, Vec<MaterialDescriptor>)) -> Self {
        Self {
            meshes,
            materials: materials
                .into_iter()
                .map(|descriptor| MaterialData {
                    descriptor,
                    diffuse_image: None,
                })
                .collect(),
        }
    }
}

/// tobj only resolves `usemtl` names after an `mtllib` directive, so one is
/// prepended when the geometry has none.
pub fn with_material_library(obj_text: String, mtl_file: &str) -> String {
    let has_mtllib = obj_text
        .lines()
        .any(|line| line.split_whitespace().next() == Some("mtllib"));
    if has_mtllib {
        obj_text
    } else {
        format!("mtllib {mtl_file}\n{obj_text}")
    }
}

/// Load a model from a material library and a geometry file.
///
/// The material library is fetched and parsed first; the geometry is only
/// requested once that succeeded and is resolved against those materials,
/// whatever `mtllib` line the OBJ file carries or lacks.
pub async fn load_obj<S: AssetSource>(
    source: &S,
    mtl_file: &str,
    obj_file: &str,
) -> anyhow::Result<CpuAsset> {
    let mtl_text = source
        .load_string(mtl_file)
        .await
        .with_context(|| format!("fetching material library {mtl_file}"))?;
    let parsed_mtl = tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mtl_text)))
        .with_context(|| format!("parsing material library {mtl_file}"))?;

    let obj_text = source
        .load_string(obj_file)
        .await
        .with_context(|| format!("fetching geometry {obj_file}"))?;
    let mut obj_reader = BufReader::new(Cursor::new(with_material_library(obj_text, mtl_file)));

    let (models, obj_materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| {
            let parsed = parsed_mtl.clone();
            async move { Ok(parsed) }
        },
    )
    .await
    .with_context(|| format!("parsing geometry {obj_file}"))?;

    let tobj_materials = match obj_materials {
        Ok(list) if !list.is_empty() => list,
        Ok(_) => parsed_mtl.0,
        Err(e) => {
            log::warn!("Materials of {obj_file} could not be resolved: {e}");
            parsed_mtl.0
        }
    };

    let meshes = mesh::load_meshes(&models, obj_file);

    let mut descriptors: Vec<_> = tobj_materials.iter().map(materials::descriptor).collect();
    if descriptors.is_empty() {
        descriptors.push(MaterialDescriptor::coloured(obj_file, [1.0; 3]));
    }

    let mut materials = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let diffuse_image = match &descriptor.diffuse_texture {
            Some(file_name) => texture::fetch_image(source, file_name).await,
            None => None,
        };
        materials.push(MaterialData {
            descriptor,
            diffuse_image,
        });
    }

    Ok(CpuAsset { meshes, materials })
}
