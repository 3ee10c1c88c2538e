//! sRGB to linear conversion for authored colours.
//!
//! Hex colours in the scene layout and `Kd`/`Ks` values in MTL files are
//! authored in sRGB, while shading happens in linear space and the surface
//! encodes back to sRGB on write.

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn srgb_to_linear_rgb(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(srgb_to_linear)
}

/// `0xRRGGBB` to linear RGB.
pub fn srgb_hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    srgb_to_linear_rgb([channel(16), channel(8), channel(0)])
}
