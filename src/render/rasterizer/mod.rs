//! Triangle rasterization.
//!
//! [`ScanlineRasterizer`] walks a projected triangle row by row, Gouraud
//! interpolating light, depth and texture coordinates, and emits every
//! fragment into a [`DepthTarget`](super::framebuffer::DepthTarget).

mod scanline;

pub use scanline::ScanlineRasterizer;
