//! A CPU scanline rasterizer for triangle meshes.
//!
//! Meshes are transformed, back-face culled and projected on the CPU, then
//! filled one scanline at a time with Gouraud-interpolated point lighting,
//! optional nearest-neighbour texturing and a per-pixel depth test. Faces of
//! a mesh are rasterized in parallel with rayon.
//!
//! # Quick Start
//!
//! ```ignore
//! use scanrast::prelude::*;
//!
//! let mut engine = Engine::new(&RenderConfig::default())?;
//! let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
//! let mut cube = Mesh::cube();
//! cube.transform_mut().rotate_y(0.5);
//!
//! engine.clear(0, 0, 0, 255);
//! engine.render(&camera, &[cube]);
//! let bgra = engine.color_bytes();
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod colors;
pub mod config;
pub mod engine;
pub mod light;
pub mod math;
pub mod mesh;
pub mod projection;
pub mod shading;
pub mod texture;
pub mod transform;

// Internal modules - used within the crate only
pub(crate) mod render;

// Re-export commonly needed types at crate root for convenience
pub use camera::Camera;
pub use config::{ConfigError, RenderConfig};
pub use engine::{Dispatch, Engine, RenderStats};
pub use light::PointLight;
pub use mesh::{Face, LoadError, Mesh, MeshError, Vertex};
pub use projection::Projection;
pub use texture::{Texture, TextureError};
pub use transform::Transform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use scanrast::prelude::*;
/// ```
pub mod prelude {
    // Scene
    pub use crate::camera::Camera;
    pub use crate::light::PointLight;
    pub use crate::mesh::{Face, Mesh, Vertex};
    pub use crate::texture::Texture;
    pub use crate::transform::Transform;

    // Engine
    pub use crate::config::RenderConfig;
    pub use crate::engine::{Dispatch, Engine, RenderStats};
    pub use crate::projection::Projection;

    // Math
    pub use crate::math::{Mat4, Vec2, Vec3, Vec4};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::engine::project;
    pub use crate::render::{DepthTarget, Fragment, FrameBuffer, ScanlineRasterizer};
}
