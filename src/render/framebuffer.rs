//! Color and depth storage shared by every rasterization task of a frame.
//!
//! Each pixel owns its own lock guarding both its depth and its color, so
//! the depth test and the two writes it gates are one indivisible step.
//! Tasks touching different pixels never contend; tasks racing on the same
//! pixel serialize on that pixel only.

use parking_lot::Mutex;

use crate::colors;

/// Something the rasterizer can emit depth-tested fragments into.
///
/// [`FrameBuffer`] is the real target. The trait exists so tests and tools
/// can observe exactly which fragments the rasterizer produces.
pub trait DepthTarget: Sync {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Writes `color` at `(x, y)` unless a closer fragment is already there.
    ///
    /// Callers must pass in-bounds coordinates. Returns whether the fragment
    /// was kept.
    fn try_write_pixel(&self, x: u32, y: u32, z: f32, color: u32) -> bool;
}

/// Depth and color of one pixel, always updated together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub depth: f32,
    pub color: u32,
}

impl Fragment {
    const fn cleared(color: u32) -> Self {
        Self {
            depth: f32::INFINITY,
            color,
        }
    }
}

/// Back buffer plus z-buffer.
///
/// Depth holds the raw transformed z of the closest fragment seen since the
/// last clear; smaller is closer and a cleared pixel holds `+inf`.
pub struct FrameBuffer {
    pixels: Vec<Mutex<Fragment>>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize;
        let pixels = (0..size)
            .map(|_| Mutex::new(Fragment::cleared(colors::BACKGROUND)))
            .collect();
        Self {
            pixels,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Resets every pixel to `color` and every depth to `+inf`.
    ///
    /// Exclusive access means no task can be writing, so no lock is taken.
    pub fn clear(&mut self, color: u32) {
        let cleared = Fragment::cleared(color);
        for pixel in &mut self.pixels {
            *pixel.get_mut() = cleared;
        }
    }

    pub fn clear_rgba(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.clear(colors::pack_rgba(r, g, b, a));
    }

    /// Depth-tested write.
    ///
    /// A fragment is rejected only when the stored depth is strictly
    /// smaller, so an equal-depth fragment replaces what is there.
    #[inline]
    pub fn try_write_pixel(&self, x: u32, y: u32, z: f32, color: u32) -> bool {
        debug_assert!(x < self.width && y < self.height, "({x}, {y}) out of bounds");
        let mut pixel = self.pixels[self.index(x, y)].lock();
        if pixel.depth < z {
            return false;
        }
        pixel.depth = z;
        pixel.color = color;
        true
    }

    /// The fragment at (x, y), or None if out of bounds.
    pub fn fragment_at(&mut self, x: u32, y: u32) -> Option<Fragment> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = self.index(x, y);
        Some(*self.pixels[index].get_mut())
    }

    pub fn color_at(&mut self, x: u32, y: u32) -> Option<u32> {
        self.fragment_at(x, y).map(|f| f.color)
    }

    pub fn depth_at(&mut self, x: u32, y: u32) -> Option<f32> {
        self.fragment_at(x, y).map(|f| f.depth)
    }

    /// Color buffer as `width * height * 4` bytes in B, G, R, A order.
    pub fn color_bytes(&mut self) -> Vec<u8> {
        self.pixels
            .iter_mut()
            .flat_map(|p| p.get_mut().color.to_le_bytes())
            .collect()
    }

    /// Color buffer as `width * height * 4` bytes in R, G, B, A order, the
    /// layout image encoders expect.
    pub fn rgba_bytes(&mut self) -> Vec<u8> {
        self.pixels
            .iter_mut()
            .flat_map(|p| colors::unpack_rgba(p.get_mut().color))
            .collect()
    }

    /// Snapshot of the depth buffer, row-major.
    pub fn depth_buffer(&mut self) -> Vec<f32> {
        self.pixels.iter_mut().map(|p| p.get_mut().depth).collect()
    }
}

impl DepthTarget for FrameBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn try_write_pixel(&self, x: u32, y: u32, z: f32, color: u32) -> bool {
        FrameBuffer::try_write_pixel(self, x, y, z, color)
    }
}
