use crate::{data_structures::texture::Texture, resources::source::AssetSource};

/// Fetch an image file referenced by a material.
///
/// A missing image is not an error for the model: the material is drawn
/// with its colour only, so failures are logged and become `None`.
pub async fn fetch_image<S: AssetSource>(source: &S, file_name: &str) -> Option<Vec<u8>> {
    match source.load_binary(file_name).await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("Texture {file_name} could not be loaded, using the colour only: {e:#}");
            None
        }
    }
}

/// Upload a diffuse map, falling back to a white texel when there is none or it doesn't decode.
pub fn diffuse_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    file_name: Option<&str>,
    bytes: Option<&[u8]>,
) -> Texture {
    let (Some(file_name), Some(bytes)) = (file_name, bytes) else {
        return Texture::white(device, queue);
    };
    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str());
    match Texture::from_bytes(device, queue, bytes, file_name, extension) {
        Ok(texture) => texture,
        Err(e) => {
            log::warn!("Texture {file_name} could not be decoded, using the colour only: {e:#}");
            Texture::white(device, queue)
        }
    }
}
