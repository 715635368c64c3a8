use std::path::Path;

use anyhow::Context;
use id_arena::Id;

use crate::color::Color;

pub type TextureId = Id<TextureData>;

/// Decoded RGBA8 image, sRGB encoded.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("Failed to load texture {}", path.display()))?
            .to_rgba8();

        Ok(Self {
            name: path.display().to_string(),
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }

    pub fn checkerboard(size: u32, cells: u32, a: Color, b: Color) -> Self {
        let size = size.max(1);
        let cell_size = (size / cells.max(1)).max(1);

        let to_bytes = |color: Color| {
            let hex = color.to_hex();
            [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 255]
        };
        let (a, b) = (to_bytes(a), to_bytes(b));

        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let even = ((x / cell_size) + (y / cell_size)) % 2 == 0;
                rgba.extend_from_slice(if even { &a } else { &b });
            }
        }

        Self {
            name: format!("Checkerboard {size}px/{cells}"),
            width: size,
            height: size,
            rgba,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(texture: &TextureData, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * texture.width + x) * 4) as usize;
        let mut pixel = [0; 4];
        pixel.copy_from_slice(&texture.rgba[offset..offset + 4]);
        pixel
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let texture = TextureData::checkerboard(8, 2, Color::WHITE, Color::BLACK);
        assert_eq!(texture.rgba.len(), 8 * 8 * 4);
        assert_eq!(pixel(&texture, 0, 0), [255, 255, 255, 255]);
        assert_eq!(pixel(&texture, 3, 3), [255, 255, 255, 255]);
        assert_eq!(pixel(&texture, 4, 0), [0, 0, 0, 255]);
        assert_eq!(pixel(&texture, 4, 4), [255, 255, 255, 255]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let error = TextureData::load("does/not/exist.png").unwrap_err();
        assert!(error.to_string().contains("does/not/exist.png"));
    }
}
