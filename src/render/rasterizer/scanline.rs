//! Scanline triangle rasterization with Gouraud-interpolated lighting.
//!
//! # Algorithm Overview
//!
//! 1. **Sort vertices** by screen Y (top to bottom), keeping the input order
//!    for equal Y.
//! 2. **Light the corners**: one Lambertian term per vertex from its world
//!    position and normal.
//! 3. **Pick sides once**: compare the inverse slopes of p1->p2 and p1->p3.
//!    If p1->p2 leans further right, p2 sits on the right side of the
//!    triangle and the long edge p1->p3 is the left boundary of every row;
//!    otherwise the roles swap. No per-row left/right test is needed.
//! 4. **Walk rows** from `floor(p1.y)` to `floor(p3.y)`. Above p2 the short
//!    side is p1->p2, below it p2->p3. Along each bounding edge X, Z, light
//!    and UV are interpolated at the row's height.
//! 5. **Fill the span** left-inclusive, right-exclusive, interpolating the
//!    same attributes across X, and hand each fragment to the depth test.
//!
//! ```text
//!        p1                       p1
//!        /|                       |\
//!   p2  / |      p2 on left       | \  p2      p2 on right
//!       \ |                       | /
//!        \|                       |/
//!        p3                       p3
//! ```
//!
//! UVs are interpolated linearly in screen space; there is no perspective
//! correction.

use crate::colors;
use crate::light::PointLight;
use crate::math::vec2::Vec2;
use crate::mesh::Vertex;
use crate::render::framebuffer::DepthTarget;
use crate::shading::interpolate;
use crate::texture::Texture;

/// Scanline rasterizer lit by a single point light.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanlineRasterizer {
    light: PointLight,
}

/// Interpolation inputs for one row: the light and UV at the four edge
/// endpoints bounding it. `[0]`/`[1]` belong to the left edge, `[2]`/`[3]`
/// to the right edge.
#[derive(Debug, Clone, Copy)]
struct ScanlineState {
    y: i32,
    ndotl: [f32; 4],
    uv: [Vec2; 4],
}

/// Attributes at one end of a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SpanEnd {
    pub x: f32,
    pub z: f32,
    pub ndotl: f32,
    pub uv: Vec2,
}

/// One row of a triangle, before it is cut into pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Span {
    pub y: i32,
    pub left: SpanEnd,
    pub right: SpanEnd,
}

/// Inverse slope dx/dy of the edge a->b, zero for a horizontal edge.
#[inline]
fn inverse_slope(a: &Vertex, b: &Vertex) -> f32 {
    let dy = b.coordinates.y - a.coordinates.y;
    if dy > 0.0 {
        (b.coordinates.x - a.coordinates.x) / dy
    } else {
        0.0
    }
}

/// Sorts by screen Y with three compare-and-swaps. Equal Y keeps input order.
#[inline]
fn sort_by_y(mut v: [Vertex; 3]) -> [Vertex; 3] {
    if v[0].coordinates.y > v[1].coordinates.y {
        v.swap(0, 1);
    }
    if v[1].coordinates.y > v[2].coordinates.y {
        v.swap(1, 2);
    }
    if v[0].coordinates.y > v[1].coordinates.y {
        v.swap(0, 1);
    }
    v
}

/// Position along the edge a->b at row `y`; a horizontal edge yields its end.
#[inline]
fn edge_gradient(y: f32, a: &Vertex, b: &Vertex) -> f32 {
    if a.coordinates.y != b.coordinates.y {
        (y - a.coordinates.y) / (b.coordinates.y - a.coordinates.y)
    } else {
        1.0
    }
}

/// Everything about a triangle that stays fixed from row to row.
pub(crate) struct TriangleSetup {
    vertices: [Vertex; 3],
    ndotl: [f32; 3],
    p2_on_right: bool,
}

impl TriangleSetup {
    pub(crate) fn new(vertices: [Vertex; 3], light: &PointLight) -> Self {
        let vertices = sort_by_y(vertices);
        let [v1, v2, v3] = &vertices;
        let ndotl = vertices.map(|v| light.intensity(v.world_coordinates, v.normal));

        // A flat top has no usable slope on p1->p2; the X order decides instead.
        // Comparing the 0 slope here puts p2 on the wrong side when it lies
        // right of p1, and the triangle comes out empty.
        let p2_on_right = if v2.coordinates.y > v1.coordinates.y {
            inverse_slope(v1, v2) > inverse_slope(v1, v3)
        } else {
            v2.coordinates.x > v1.coordinates.x
        };

        Self {
            vertices,
            ndotl,
            p2_on_right,
        }
    }

    /// Whether every vertex has finite screen coordinates.
    fn is_finite(&self) -> bool {
        self.vertices.iter().all(|v| {
            v.coordinates.x.is_finite() && v.coordinates.y.is_finite() && v.coordinates.z.is_finite()
        })
    }

    /// Rows covered by the triangle. Empty when it has no height.
    pub(crate) fn rows(&self) -> std::ops::RangeInclusive<i32> {
        let top = self.vertices[0].coordinates.y;
        let bottom = self.vertices[2].coordinates.y;
        if bottom <= top {
            return 1..=0;
        }
        top.floor() as i32..=bottom.floor() as i32
    }

    /// Interpolated row endpoints at scanline `y`.
    pub(crate) fn span_at(&self, y: i32) -> Span {
        let [v1, v2, v3] = &self.vertices;
        let [nl1, nl2, nl3] = self.ndotl;
        let (t1, t2, t3) = (
            v1.texture_coordinates,
            v2.texture_coordinates,
            v3.texture_coordinates,
        );
        let above_p2 = (y as f32) < v2.coordinates.y;

        let (state, edges) = match (self.p2_on_right, above_p2) {
            (true, true) => (
                ScanlineState {
                    y,
                    ndotl: [nl1, nl3, nl1, nl2],
                    uv: [t1, t3, t1, t2],
                },
                [v1, v3, v1, v2],
            ),
            (true, false) => (
                ScanlineState {
                    y,
                    ndotl: [nl1, nl3, nl2, nl3],
                    uv: [t1, t3, t2, t3],
                },
                [v1, v3, v2, v3],
            ),
            (false, true) => (
                ScanlineState {
                    y,
                    ndotl: [nl1, nl2, nl1, nl3],
                    uv: [t1, t2, t1, t3],
                },
                [v1, v2, v1, v3],
            ),
            (false, false) => (
                ScanlineState {
                    y,
                    ndotl: [nl2, nl3, nl1, nl3],
                    uv: [t2, t3, t1, t3],
                },
                [v2, v3, v1, v3],
            ),
        };

        Self::span_between(&state, edges)
    }

    /// Walks the left edge `a->b` and the right edge `c->d` down to the
    /// state's row.
    fn span_between(state: &ScanlineState, [a, b, c, d]: [&Vertex; 4]) -> Span {
        let y = state.y as f32;
        let gradient1 = edge_gradient(y, a, b);
        let gradient2 = edge_gradient(y, c, d);

        let end = |p: &Vertex, q: &Vertex, gradient: f32, nl: [f32; 2], uv: [Vec2; 2]| SpanEnd {
            x: interpolate(p.coordinates.x, q.coordinates.x, gradient),
            z: interpolate(p.coordinates.z, q.coordinates.z, gradient),
            ndotl: interpolate(nl[0], nl[1], gradient),
            uv: Vec2::new(
                interpolate(uv[0].x, uv[1].x, gradient),
                interpolate(uv[0].y, uv[1].y, gradient),
            ),
        };

        Span {
            y: state.y,
            left: end(
                a,
                b,
                gradient1,
                [state.ndotl[0], state.ndotl[1]],
                [state.uv[0], state.uv[1]],
            ),
            right: end(
                c,
                d,
                gradient2,
                [state.ndotl[2], state.ndotl[3]],
                [state.uv[2], state.uv[3]],
            ),
        }
    }
}

impl ScanlineRasterizer {
    pub fn new(light: PointLight) -> Self {
        Self { light }
    }

    pub fn light(&self) -> PointLight {
        self.light
    }

    pub fn set_light(&mut self, light: PointLight) {
        self.light = light;
    }

    /// Rasterizes one projected triangle into `target`.
    ///
    /// Vertices carry screen-space x/y and raw depth in `coordinates`, plus
    /// world position and normal for lighting. Each fragment's color is the
    /// texel under its UV (or `color` when untextured) scaled by the
    /// interpolated light. Returns the number of fragments that passed the
    /// depth test.
    pub fn draw_triangle<T: DepthTarget + ?Sized>(
        &self,
        v1: Vertex,
        v2: Vertex,
        v3: Vertex,
        color: u32,
        texture: Option<&Texture>,
        target: &T,
    ) -> usize {
        let setup = TriangleSetup::new([v1, v2, v3], &self.light);
        if !setup.is_finite() {
            return 0;
        }

        let rows = setup.rows();
        let first = (*rows.start()).max(0);
        let last = (*rows.end()).min(target.height() as i32 - 1);
        (first..=last)
            .map(|y| Self::fill_span(&setup.span_at(y), color, texture, target))
            .sum()
    }

    /// Fills `[floor(left.x), floor(right.x))` on the span's row.
    fn fill_span<T: DepthTarget + ?Sized>(
        span: &Span,
        color: u32,
        texture: Option<&Texture>,
        target: &T,
    ) -> usize {
        let sx = span.left.x.floor() as i32;
        let ex = span.right.x.floor() as i32;
        let (left, right) = (&span.left, &span.right);
        let mut written = 0;

        // Columns outside the buffer are skipped up front; gradients still
        // run over the full [sx, ex) so visible pixels are unaffected.
        for x in sx.max(0)..ex.min(target.width() as i32) {
            let gradient = (x as f32 - sx as f32) / (ex as f32 - sx as f32);
            let z = interpolate(left.z, right.z, gradient);
            let ndotl = interpolate(left.ndotl, right.ndotl, gradient);
            let base = match texture {
                Some(texture) => {
                    let u = interpolate(left.uv.x, right.uv.x, gradient);
                    let v = interpolate(left.uv.y, right.uv.y, gradient);
                    texture.map(u, v)
                }
                None => color,
            };
            if Self::draw_point(x, span.y, z, colors::modulate(base, ndotl), target) {
                written += 1;
            }
        }
        written
    }

    /// Drops fragments outside the target, depth-tests the rest.
    #[inline]
    fn draw_point<T: DepthTarget + ?Sized>(x: i32, y: i32, z: f32, color: u32, target: &T) -> bool {
        if x >= 0 && y >= 0 && x < target.width() as i32 && y < target.height() as i32 {
            target.try_write_pixel(x as u32, y as u32, z, color)
        } else {
            false
        }
    }
}
