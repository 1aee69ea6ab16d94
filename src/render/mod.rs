//! Frame storage and triangle filling.

pub mod framebuffer;
pub mod rasterizer;

pub use framebuffer::{DepthTarget, Fragment, FrameBuffer};
pub use rasterizer::ScanlineRasterizer;
