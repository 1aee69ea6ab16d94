use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scanrast::bench::{FrameBuffer, ScanlineRasterizer};
use scanrast::prelude::*;

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

fn screen_vertex(x: f32, y: f32, z: f32) -> Vertex {
    Vertex {
        coordinates: Vec3::new(x, y, z),
        normal: Vec3::FORWARD,
        world_coordinates: Vec3::ZERO,
        texture_coordinates: Vec2::new(x / BUFFER_WIDTH as f32, y / BUFFER_HEIGHT as f32),
    }
}

fn small_triangle() -> [Vertex; 3] {
    [
        screen_vertex(100.0, 100.0, 0.5),
        screen_vertex(120.0, 100.0, 0.5),
        screen_vertex(110.0, 120.0, 0.5),
    ]
}

fn medium_triangle() -> [Vertex; 3] {
    [
        screen_vertex(100.0, 100.0, 0.5),
        screen_vertex(300.0, 100.0, 0.5),
        screen_vertex(200.0, 300.0, 0.5),
    ]
}

fn large_triangle() -> [Vertex; 3] {
    [
        screen_vertex(50.0, 50.0, 0.5),
        screen_vertex(750.0, 100.0, 0.5),
        screen_vertex(400.0, 550.0, 0.5),
    ]
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");

    let rasterizer = ScanlineRasterizer::new(PointLight::default());
    let texture = Texture::from_raw(
        2,
        2,
        scanrast::texture::TexelLayout::Rgb,
        vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
    )
    .ok();

    for (name, triangle) in [
        ("small", small_triangle()),
        ("medium", medium_triangle()),
        ("large", large_triangle()),
    ] {
        group.bench_with_input(BenchmarkId::new("flat", name), &triangle, |b, tri| {
            let mut fb = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            b.iter(|| {
                fb.clear(0xFF000000);
                let [a, v, w] = *black_box(tri);
                rasterizer.draw_triangle(a, v, w, 0xFFFF0000, None, &fb)
            });
        });

        group.bench_with_input(BenchmarkId::new("textured", name), &triangle, |b, tri| {
            let mut fb = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            b.iter(|| {
                fb.clear(0xFF000000);
                let [a, v, w] = *black_box(tri);
                rasterizer.draw_triangle(a, v, w, 0xFFFF0000, texture.as_ref(), &fb)
            });
        });
    }

    group.finish();
}

fn benchmark_many_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_triangles");

    let rasterizer = ScanlineRasterizer::new(PointLight::default());

    // Generate a grid of small triangles
    let triangles: Vec<[Vertex; 3]> = (0..20)
        .flat_map(|row| {
            (0..20).map(move |col| {
                let x = col as f32 * 40.0;
                let y = row as f32 * 30.0;
                [
                    screen_vertex(x, y, 0.5),
                    screen_vertex(x + 35.0, y, 0.5),
                    screen_vertex(x + 17.5, y + 25.0, 0.5),
                ]
            })
        })
        .collect();

    group.bench_function("scanline_400_triangles", |b| {
        let mut fb = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        b.iter(|| {
            fb.clear(0xFF000000);
            for [a, v, w] in &triangles {
                rasterizer.draw_triangle(*a, *v, *w, 0xFFFF0000, None, black_box(&fb));
            }
        });
    });

    group.finish();
}

fn benchmark_cube_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("cube_frame");

    let camera = Camera::default();
    let mut cube = Mesh::cube();
    cube.transform_mut().set_rotation(Vec3::new(0.4, 0.6, 0.0));
    let meshes = [cube];

    for dispatch in [Dispatch::Parallel, Dispatch::Sequential] {
        let config = RenderConfig {
            width: BUFFER_WIDTH,
            height: BUFFER_HEIGHT,
            dispatch,
            ..RenderConfig::default()
        };
        let Ok(mut engine) = Engine::new(&config) else {
            continue;
        };
        group.bench_function(BenchmarkId::new("render", dispatch), |b| {
            b.iter(|| {
                engine.clear(0, 0, 0, 255);
                engine.render(black_box(&camera), &meshes)
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_triangle,
    benchmark_many_triangles,
    benchmark_cube_frame
);
criterion_main!(benches);
