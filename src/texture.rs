use std::path::Path;

use image::imageops::FilterType;
use thiserror::Error;

use crate::colors::{self, pack_rgba};

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("texture size must be non-zero, got {width}x{height}")]
    EmptySize { width: u32, height: u32 },

    #[error("texel buffer holds {actual} bytes, {width}x{height} {layout:?} needs {expected}")]
    BufferSize {
        width: u32,
        height: u32,
        layout: TexelLayout,
        expected: usize,
        actual: usize,
    },

    #[error("failed to decode texture image")]
    Decode(#[from] image::ImageError),
}

/// How texels are laid out in the raw byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexelLayout {
    Rgb,
    Rgba,
}

impl TexelLayout {
    pub const fn bytes_per_texel(self) -> usize {
        match self {
            TexelLayout::Rgb => 3,
            TexelLayout::Rgba => 4,
        }
    }
}

/// A fixed-size 2D texture sampled with nearest-neighbour, wrap-around
/// addressing.
///
/// The pixel data may be absent while the image is still pending; sampling
/// such a texture yields opaque white.
#[derive(Debug, Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    layout: TexelLayout,
    pixels: Option<Vec<u8>>,
}

impl Texture {
    /// Wraps an already decoded texel buffer.
    ///
    /// `bytes.len()` must equal `width * height * layout.bytes_per_texel()`.
    pub fn from_raw(
        width: u32,
        height: u32,
        layout: TexelLayout,
        bytes: Vec<u8>,
    ) -> Result<Self, TextureError> {
        let expected = Self::expected_len(width, height, layout)?;
        if bytes.len() != expected {
            return Err(TextureError::BufferSize {
                width,
                height,
                layout,
                expected,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            pixels: Some(bytes),
        })
    }

    /// A texture of the given size whose pixels have not been loaded yet.
    pub fn pending(width: u32, height: u32) -> Result<Self, TextureError> {
        Self::expected_len(width, height, TexelLayout::Rgba)?;
        Ok(Self {
            width,
            height,
            layout: TexelLayout::Rgba,
            pixels: None,
        })
    }

    /// Decodes an image file (PNG, JPG, ...) and resizes it to `width x height`.
    pub fn from_file<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<Self, TextureError> {
        let mut texture = Self::pending(width, height)?;
        texture.load_file(path)?;
        Ok(texture)
    }

    /// Fills a pending texture (or replaces the pixels of a loaded one).
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), TextureError> {
        let path = path.as_ref();
        let mut img = image::open(path)?.to_rgba8();
        if img.dimensions() != (self.width, self.height) {
            log::debug!(
                "resizing texture {} from {:?} to {}x{}",
                path.display(),
                img.dimensions(),
                self.width,
                self.height
            );
            img = image::imageops::resize(&img, self.width, self.height, FilterType::Triangle);
        }
        self.layout = TexelLayout::Rgba;
        self.pixels = Some(img.into_raw());
        Ok(())
    }

    fn expected_len(width: u32, height: u32, layout: TexelLayout) -> Result<usize, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::EmptySize { width, height });
        }
        Ok(width as usize * height as usize * layout.bytes_per_texel())
    }

    /// Samples the texel under `(u, v)`.
    ///
    /// Coordinates outside [0, 1] repeat the texture: the texel column is
    /// `|floor(u * width)| mod width`, likewise for rows. Returns opaque
    /// white while no pixels are loaded.
    #[inline]
    pub fn map(&self, u: f32, v: f32) -> u32 {
        let Some(pixels) = &self.pixels else {
            return colors::WHITE;
        };

        let x = Self::wrap(u, self.width);
        let y = Self::wrap(v, self.height);

        let bpp = self.layout.bytes_per_texel();
        let offset = (y * self.width as usize + x) * bpp;
        let texel = &pixels[offset..offset + bpp];
        match self.layout {
            TexelLayout::Rgb => pack_rgba(texel[0], texel[1], texel[2], 255),
            TexelLayout::Rgba => pack_rgba(texel[0], texel[1], texel[2], texel[3]),
        }
    }

    #[inline]
    fn wrap(coordinate: f32, size: u32) -> usize {
        let scaled = (coordinate * size as f32).floor() as i64;
        (scaled.unsigned_abs() % size as u64) as usize
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> TexelLayout {
        self.layout
    }

    pub fn is_loaded(&self) -> bool {
        self.pixels.is_some()
    }
}
