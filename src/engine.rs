//! Core rendering engine.
//!
//! The [`Engine`] owns the frame buffer and drives each frame: for every mesh
//! it builds the world, view and projection matrices, culls faces turned
//! away from the camera, projects the rest to screen space and hands them to
//! the [`ScanlineRasterizer`].
//!
//! # Frame Flow
//!
//! ```text
//! clear() --> render(camera, meshes) --> color_bytes()
//!               |
//!               +-- per mesh (in order)
//!                     +-- per face (rayon or sequential)
//!                           cull --> project x3 --> draw_triangle
//! ```
//!
//! Faces of one mesh may be drawn concurrently. They share the frame buffer,
//! whose per-pixel locks keep every depth test atomic.

use rayon::prelude::*;
use serde::Deserialize;

use crate::camera::Camera;
use crate::config::{ConfigError, RenderConfig};
use crate::light::PointLight;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::mesh::{Face, Mesh, Vertex};
use crate::projection::Projection;
use crate::render::{FrameBuffer, ScanlineRasterizer};

/// How the faces of a mesh are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dispatch {
    /// One rayon task per face.
    #[default]
    Parallel,
    /// Faces in mesh order on the calling thread. Equal-depth ties then
    /// resolve the same way every frame.
    Sequential,
}

impl std::fmt::Display for Dispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dispatch::Parallel => write!(f, "Parallel"),
            Dispatch::Sequential => write!(f, "Sequential"),
        }
    }
}

/// Counters for one call to [`Engine::render`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub meshes: usize,
    pub faces_drawn: usize,
    pub faces_culled: usize,
    /// Fragments that passed the depth test when written.
    pub fragments_written: usize,
}

impl RenderStats {
    fn culled() -> Self {
        Self {
            faces_culled: 1,
            ..Self::default()
        }
    }

    fn drawn(fragments_written: usize) -> Self {
        Self {
            faces_drawn: 1,
            fragments_written,
            ..Self::default()
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            meshes: self.meshes + other.meshes,
            faces_drawn: self.faces_drawn + other.faces_drawn,
            faces_culled: self.faces_culled + other.faces_culled,
            fragments_written: self.fragments_written + other.fragments_written,
        }
    }
}

/// Per-mesh matrices shared by every face of that mesh.
struct MeshTransforms {
    world: Mat4,
    world_view: Mat4,
    transform: Mat4,
}

pub struct Engine {
    frame_buffer: FrameBuffer,
    rasterizer: ScanlineRasterizer,
    projection: Projection,
    dispatch: Dispatch,
    clear_color: u32,
}

impl Engine {
    pub fn new(config: &RenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut frame_buffer = FrameBuffer::new(config.width, config.height);
        frame_buffer.clear(config.clear_color());
        log::info!(
            "engine created: {}x{}, {} dispatch",
            config.width,
            config.height,
            config.dispatch
        );
        Ok(Self {
            frame_buffer,
            rasterizer: ScanlineRasterizer::new(config.light()),
            projection: config.projection(),
            dispatch: config.dispatch,
            clear_color: config.clear_color(),
        })
    }

    pub fn width(&self) -> u32 {
        self.frame_buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.frame_buffer.height()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn projection_mut(&mut self) -> &mut Projection {
        &mut self.projection
    }

    pub fn dispatch(&self) -> Dispatch {
        self.dispatch
    }

    pub fn set_dispatch(&mut self, dispatch: Dispatch) {
        self.dispatch = dispatch;
    }

    pub fn light(&self) -> PointLight {
        self.rasterizer.light()
    }

    pub fn set_light(&mut self, light: PointLight) {
        self.rasterizer.set_light(light);
    }

    /// Replaces the frame buffer with a cleared one of the new size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyViewport { width, height });
        }
        self.frame_buffer = FrameBuffer::new(width, height);
        self.frame_buffer.clear(self.clear_color);
        self.projection.set_aspect_ratio(width as f32 / height as f32);
        log::info!("engine resized to {}x{}", width, height);
        Ok(())
    }

    /// Resets color to the configured clear color and depth to `+inf`.
    pub fn clear_frame(&mut self) {
        self.frame_buffer.clear(self.clear_color);
    }

    pub fn clear(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.frame_buffer.clear_rgba(r, g, b, a);
    }

    pub fn clear_color(&mut self, color: u32) {
        self.frame_buffer.clear(color);
    }

    /// Projects an object-space vertex to screen space.
    ///
    /// X and Y are divided by the bottom-right element of `transform` and
    /// shifted to the buffer centre, with Y flipped so it grows downward.
    /// Z keeps the raw transformed value for the depth test. The normal and
    /// position are also carried into world space for lighting.
    pub fn project(&self, vertex: &Vertex, transform: &Mat4, world: &Mat4) -> Vertex {
        project(
            vertex,
            transform,
            world,
            self.frame_buffer.width(),
            self.frame_buffer.height(),
        )
    }

    /// Draws every mesh as seen from `camera` into the current frame.
    ///
    /// Does not clear first; call [`Engine::clear`] between frames.
    pub fn render(&mut self, camera: &Camera, meshes: &[Mesh]) -> RenderStats {
        let view = camera.view_matrix();
        let projection = self.projection.matrix();
        let this = &*self;

        let mut stats = RenderStats::default();
        for mesh in meshes {
            let world = mesh.transform().to_matrix();
            let world_view = view * world;
            let transforms = MeshTransforms {
                world,
                world_view,
                transform: projection * world_view,
            };

            let draw = |face: &Face| this.draw_face(mesh, face, &transforms);
            let mesh_stats = match this.dispatch {
                Dispatch::Parallel => mesh
                    .faces()
                    .par_iter()
                    .map(draw)
                    .reduce(RenderStats::default, RenderStats::merge),
                Dispatch::Sequential => mesh
                    .faces()
                    .iter()
                    .map(draw)
                    .fold(RenderStats::default(), RenderStats::merge),
            };
            log::trace!(
                "mesh {:?}: {} drawn, {} culled",
                mesh.name(),
                mesh_stats.faces_drawn,
                mesh_stats.faces_culled
            );

            stats = stats.merge(mesh_stats);
            stats.meshes += 1;
        }

        log::debug!(
            "frame: {} meshes, {} faces drawn, {} culled, {} fragments",
            stats.meshes,
            stats.faces_drawn,
            stats.faces_culled,
            stats.fragments_written
        );
        stats
    }

    fn draw_face(&self, mesh: &Mesh, face: &Face, transforms: &MeshTransforms) -> RenderStats {
        // Facing the camera means a negative view-space normal z.
        let view_normal = transforms.world_view.transform_normal(face.normal);
        if view_normal.z >= 0.0 {
            return RenderStats::culled();
        }

        let vertices = mesh.vertices();
        let [a, b, c] = face
            .indices()
            .map(|i| self.project(&vertices[i], &transforms.transform, &transforms.world));
        let written = self.rasterizer.draw_triangle(
            a,
            b,
            c,
            mesh.color(),
            mesh.texture(),
            &self.frame_buffer,
        );
        RenderStats::drawn(written)
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    pub fn frame_buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame_buffer
    }

    /// Color buffer as B, G, R, A bytes, row-major.
    pub fn color_bytes(&mut self) -> Vec<u8> {
        self.frame_buffer.color_bytes()
    }

    /// Color buffer as R, G, B, A bytes, row-major.
    pub fn rgba_bytes(&mut self) -> Vec<u8> {
        self.frame_buffer.rgba_bytes()
    }

    pub fn depth_buffer(&mut self) -> Vec<f32> {
        self.frame_buffer.depth_buffer()
    }
}

/// Screen-space projection shared by [`Engine::project`] and the benches.
pub fn project(vertex: &Vertex, transform: &Mat4, world: &Mat4, width: u32, height: u32) -> Vertex {
    let clip = transform.transform_point(vertex.coordinates);
    let w = transform.m44();
    Vertex {
        coordinates: Vec3::new(
            clip.x / w + width as f32 / 2.0,
            -clip.y / w + height as f32 / 2.0,
            clip.z,
        ),
        normal: world.transform_normal(vertex.normal),
        world_coordinates: world.transform_point(vertex.coordinates).to_vec3(),
        texture_coordinates: vertex.texture_coordinates,
    }
}
