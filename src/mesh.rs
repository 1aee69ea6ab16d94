//! Geometry handed to the engine: vertices, faces and meshes.
//!
//! Meshes are built once (by a loader or one of the primitive builders) and
//! validated on construction, so the render path can index vertex arrays
//! without bounds bookkeeping. Only the [`Transform`] is expected to change
//! between frames.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::colors;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::texture::Texture;
use crate::transform::Transform;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("face {face} references vertex {index}, mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to parse OBJ file")]
    Obj(#[from] tobj::LoadError),

    #[error("OBJ file {0} contains no geometry")]
    Empty(String),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// A mesh vertex.
///
/// Before projection `coordinates` is the object-space position. The
/// projected copy produced by the engine carries screen-space x/y plus the
/// raw transformed z in `coordinates`, with world-space position and normal
/// alongside for lighting.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub coordinates: Vec3,
    pub normal: Vec3,
    pub world_coordinates: Vec3,
    pub texture_coordinates: Vec2,
}

impl Vertex {
    pub fn new(coordinates: Vec3, normal: Vec3, texture_coordinates: Vec2) -> Self {
        Self {
            coordinates,
            normal,
            world_coordinates: Vec3::ZERO,
            texture_coordinates,
        }
    }
}

/// A triangle as three indices into the owning mesh's vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    /// Object-space normal used for back-face culling.
    pub normal: Vec3,
}

impl Face {
    /// A face whose normal is derived when the mesh is built.
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self {
            a,
            b,
            c,
            normal: Vec3::ZERO,
        }
    }

    pub const fn with_normal(a: u32, b: u32, c: u32, normal: Vec3) -> Self {
        Self { a, b, c, normal }
    }

    #[inline]
    pub fn indices(&self) -> [usize; 3] {
        [self.a as usize, self.b as usize, self.c as usize]
    }
}

pub struct Mesh {
    name: String,
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    transform: Transform,
    color: u32,
    texture: Option<Arc<Texture>>,
}

impl Mesh {
    /// Builds a mesh, checking every face index against the vertex list.
    ///
    /// Missing normals are derived: a vertex with a zero normal gets the
    /// normalized sum of its faces' geometric normals, and a face with a zero
    /// normal gets the normalized average of its three vertex normals.
    pub fn new(
        name: impl Into<String>,
        mut vertices: Vec<Vertex>,
        mut faces: Vec<Face>,
    ) -> Result<Self, MeshError> {
        let vertex_count = vertices.len();
        for (face_index, face) in faces.iter().enumerate() {
            if let Some(&index) = [face.a, face.b, face.c]
                .iter()
                .find(|&&i| i as usize >= vertex_count)
            {
                return Err(MeshError::IndexOutOfRange {
                    face: face_index,
                    index,
                    vertex_count,
                });
            }
        }

        Self::fill_vertex_normals(&mut vertices, &faces);
        for face in faces.iter_mut().filter(|f| f.normal == Vec3::ZERO) {
            let [a, b, c] = face.indices();
            face.normal =
                ((vertices[a].normal + vertices[b].normal + vertices[c].normal) / 3.0).normalize();
        }

        Ok(Self {
            name: name.into(),
            vertices,
            faces,
            transform: Transform::default(),
            color: colors::WHITE,
            texture: None,
        })
    }

    fn fill_vertex_normals(vertices: &mut [Vertex], faces: &[Face]) {
        if vertices.iter().all(|v| v.normal != Vec3::ZERO) {
            return;
        }
        let mut accumulated = vec![Vec3::ZERO; vertices.len()];
        for face in faces {
            let [a, b, c] = face.indices();
            let pa = vertices[a].coordinates;
            let geometric = (vertices[b].coordinates - pa).cross(vertices[c].coordinates - pa);
            for i in [a, b, c] {
                accumulated[i] = accumulated[i] + geometric;
            }
        }
        for (vertex, sum) in vertices.iter_mut().zip(accumulated) {
            if vertex.normal == Vec3::ZERO {
                vertex.normal = sum.normalize();
            }
        }
    }

    /// A cube spanning [-1, 1] on every axis with flat per-side normals and
    /// a full [0, 1] UV square on each side.
    pub fn cube() -> Self {
        let sides = [
            (Vec3::FORWARD, Vec3::new(1.0, 0.0, 0.0), Vec3::UP),
            (Vec3::BACK, Vec3::new(-1.0, 0.0, 0.0), Vec3::UP),
            (Vec3::new(1.0, 0.0, 0.0), Vec3::BACK, Vec3::UP),
            (Vec3::new(-1.0, 0.0, 0.0), Vec3::FORWARD, Vec3::UP),
            (Vec3::UP, Vec3::new(1.0, 0.0, 0.0), Vec3::BACK),
            (-Vec3::UP, Vec3::new(1.0, 0.0, 0.0), Vec3::FORWARD),
        ];
        let mut vertices = Vec::with_capacity(24);
        let mut faces = Vec::with_capacity(12);
        for (normal, u, v) in sides {
            push_quad(&mut vertices, &mut faces, normal, u, v, normal);
        }
        Self::from_parts("Cube", vertices, faces)
    }

    /// A square in the XY plane centred on the origin, facing +Z.
    pub fn quad(half_extent: f32) -> Self {
        let mut vertices = Vec::with_capacity(4);
        let mut faces = Vec::with_capacity(2);
        push_quad(
            &mut vertices,
            &mut faces,
            Vec3::ZERO,
            Vec3::new(half_extent, 0.0, 0.0),
            Vec3::new(0.0, half_extent, 0.0),
            Vec3::FORWARD,
        );
        Self::from_parts("Quad", vertices, faces)
    }

    /// Primitive builders produce indices in range by construction.
    fn from_parts(name: &str, vertices: Vec<Vertex>, faces: Vec<Face>) -> Self {
        Self {
            name: name.to_string(),
            vertices,
            faces,
            transform: Transform::default(),
            color: colors::WHITE,
            texture: None,
        }
    }

    /// Loads every object in an OBJ file as a separate mesh.
    ///
    /// Faces are triangulated and positions, normals and UVs are unified
    /// under a single index. V is flipped so the texture's top row sits at
    /// v = 0, matching how [`Texture::map`] addresses rows.
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Vec<Mesh>, LoadError> {
        let path = path.as_ref();
        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path, &options)?;

        let mut meshes = Vec::with_capacity(models.len());
        for model in models {
            let m = &model.mesh;
            let vertices: Vec<Vertex> = m
                .positions
                .chunks_exact(3)
                .enumerate()
                .map(|(i, p)| {
                    let normal = m
                        .normals
                        .get(i * 3..i * 3 + 3)
                        .map_or(Vec3::ZERO, |n| Vec3::new(n[0], n[1], n[2]));
                    let uv = m
                        .texcoords
                        .get(i * 2..i * 2 + 2)
                        .map_or(Vec2::ZERO, |t| Vec2::new(t[0], 1.0 - t[1]));
                    Vertex::new(Vec3::new(p[0], p[1], p[2]), normal, uv)
                })
                .collect();
            let faces: Vec<Face> = m
                .indices
                .chunks_exact(3)
                .map(|f| Face::new(f[0], f[1], f[2]))
                .collect();
            log::debug!(
                "loaded object {:?}: {} vertices, {} faces",
                model.name,
                vertices.len(),
                faces.len()
            );
            meshes.push(Mesh::new(model.name, vertices, faces)?);
        }

        if meshes.is_empty() {
            return Err(LoadError::Empty(path.display().to_string()));
        }
        Ok(meshes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Base color used when no texture is bound.
    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn set_color(&mut self, color: u32) {
        self.color = color;
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_deref()
    }

    pub fn set_texture(&mut self, texture: Arc<Texture>) {
        self.texture = Some(texture);
    }

    pub fn clear_texture(&mut self) {
        self.texture = None;
    }
}

/// Appends a two-triangle quad centred at `center` spanning `±u` and `±v`.
///
/// Corners wind counter-clockwise when viewed from the side `u × v` points to.
fn push_quad(
    vertices: &mut Vec<Vertex>,
    faces: &mut Vec<Face>,
    center: Vec3,
    u: Vec3,
    v: Vec3,
    normal: Vec3,
) {
    let base = vertices.len() as u32;
    let corners = [
        (center - u - v, Vec2::new(0.0, 1.0)),
        (center + u - v, Vec2::new(1.0, 1.0)),
        (center + u + v, Vec2::new(1.0, 0.0)),
        (center - u + v, Vec2::new(0.0, 0.0)),
    ];
    for (position, uv) in corners {
        vertices.push(Vertex::new(position, normal, uv));
    }
    faces.push(Face::with_normal(base, base + 1, base + 2, normal));
    faces.push(Face::with_normal(base, base + 2, base + 3, normal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle_without_normals() -> Vec<Vertex> {
        vec![
            Vertex::new(Vec3::new(0.0, 0.0, 0.0), Vec3::ZERO, Vec2::ZERO),
            Vertex::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, Vec2::ZERO),
            Vertex::new(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, Vec2::ZERO),
        ]
    }

    #[test]
    fn rejects_out_of_range_indices() {
        let err = Mesh::new("bad", triangle_without_normals(), vec![Face::new(0, 1, 3)])
            .err()
            .unwrap();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                face: 0,
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn derives_normals_from_winding() {
        let mesh = Mesh::new("tri", triangle_without_normals(), vec![Face::new(0, 1, 2)]).unwrap();
        for v in mesh.vertices() {
            assert_eq!(v.normal, Vec3::FORWARD);
        }
        assert_eq!(mesh.faces()[0].normal, Vec3::FORWARD);
    }

    #[test]
    fn face_normal_averages_vertex_normals() {
        let mut vertices = triangle_without_normals();
        vertices[0].normal = Vec3::new(1.0, 0.0, 0.0);
        vertices[1].normal = Vec3::UP;
        vertices[2].normal = Vec3::FORWARD;
        let mesh = Mesh::new("tri", vertices, vec![Face::new(0, 1, 2)]).unwrap();
        let n = mesh.faces()[0].normal;
        let third = 1.0 / 3.0_f32.sqrt();
        assert_relative_eq!(n.x, third, epsilon = 1e-6);
        assert_relative_eq!(n.y, third, epsilon = 1e-6);
        assert_relative_eq!(n.z, third, epsilon = 1e-6);
    }

    #[test]
    fn cube_winding_agrees_with_normals() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices().len(), 24);
        assert_eq!(cube.faces().len(), 12);
        for face in cube.faces() {
            let [a, b, c] = face.indices();
            let v = cube.vertices();
            let pa = v[a].coordinates;
            let geometric = (v[b].coordinates - pa).cross(v[c].coordinates - pa);
            assert!(geometric.dot(face.normal) > 0.0, "face {:?} winds inward", face);
            // Each face sits on the side its normal points to
            assert_relative_eq!(pa.dot(face.normal), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn quad_faces_positive_z() {
        let quad = Mesh::quad(2.0);
        assert_eq!(quad.faces().len(), 2);
        assert!(quad.faces().iter().all(|f| f.normal == Vec3::FORWARD));
        let max_x = quad
            .vertices()
            .iter()
            .map(|v| v.coordinates.x)
            .fold(f32::MIN, f32::max);
        assert_eq!(max_x, 2.0);
    }

    #[test]
    fn texture_is_shared() {
        let texture = Arc::new(Texture::pending(2, 2).unwrap());
        let mut a = Mesh::quad(1.0);
        let mut b = Mesh::cube();
        a.set_texture(Arc::clone(&texture));
        b.set_texture(texture);
        assert!(a.texture().is_some() && b.texture().is_some());
        a.clear_texture();
        assert!(a.texture().is_none());
    }
}
