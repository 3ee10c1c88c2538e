use crate::data_structures::{colour, model::MaterialDescriptor};

/// Translate an MTL material into a Blinn-Phong descriptor.
///
/// `Kd` and `Ks` are sRGB and converted to linear. Missing values keep the
/// defaults of [`MaterialDescriptor::coloured`] with a white diffuse colour.
/// Opacity is taken from `d`, or from `Tr` as `1 - Tr` when `d` is absent.
pub fn descriptor(material: &tobj::Material) -> MaterialDescriptor {
    let defaults = MaterialDescriptor::coloured(&material.name, [1.0; 3]);
    let opacity = material
        .dissolve
        .or_else(|| {
            material
                .unknown_param
                .get("Tr")
                .and_then(|tr| tr.trim().parse::<f32>().ok())
                .map(|tr| 1.0 - tr)
        })
        .unwrap_or(defaults.opacity)
        .clamp(0.0, 1.0);

    MaterialDescriptor {
        diffuse: material
            .diffuse
            .map(colour::srgb_to_linear_rgb)
            .unwrap_or(defaults.diffuse),
        specular: material
            .specular
            .map(colour::srgb_to_linear_rgb)
            .unwrap_or(defaults.specular),
        shininess: material.shininess.unwrap_or(defaults.shininess),
        opacity,
        diffuse_texture: material
            .diffuse_texture
            .as_ref()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        ..defaults
    }
}
