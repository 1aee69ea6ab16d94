use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use scanrast::prelude::*;

/// Renders meshes off-screen with the scanline rasterizer and saves a PNG.
#[derive(Parser, Debug)]
#[command(name = "scanrast", version, about)]
struct Args {
    /// TOML render settings; defaults apply to every missing key
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// OBJ file to render instead of the built-in cube
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Image bound as the texture of every mesh
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Texture size the image is resampled to
    #[arg(long, default_value_t = 512)]
    texture_size: u32,

    /// Frames to render; meshes spin a little between frames
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// Camera distance from the origin along +Z
    #[arg(long, default_value_t = scanrast::camera::DEFAULT_DISTANCE)]
    distance: f32,

    /// Output PNG path
    #[arg(short, long, default_value = "frame.png")]
    out: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    let config = match &args.config {
        Some(path) => RenderConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    let mut meshes = match &args.obj {
        Some(path) => {
            Mesh::load_obj(path).with_context(|| format!("loading mesh {}", path.display()))?
        }
        None => vec![Mesh::cube()],
    };

    if let Some(path) = &args.texture {
        let texture = Texture::from_file(path, args.texture_size, args.texture_size)
            .with_context(|| format!("loading texture {}", path.display()))?;
        let texture = Arc::new(texture);
        for mesh in &mut meshes {
            mesh.set_texture(Arc::clone(&texture));
        }
    }

    let mut engine = Engine::new(&config)?;
    let camera = Camera::new(Vec3::new(0.0, 0.0, args.distance), Vec3::ZERO);

    let mut stats = RenderStats::default();
    for _ in 0..args.frames {
        for mesh in &mut meshes {
            mesh.transform_mut().rotate_x(0.01).rotate_y(0.01);
        }
        engine.clear_frame();
        stats = engine.render(&camera, &meshes);
    }
    info!(
        "rendered {} frame(s): {} faces drawn, {} culled, {} fragments",
        args.frames, stats.faces_drawn, stats.faces_culled, stats.fragments_written
    );

    let image = image::RgbaImage::from_raw(engine.width(), engine.height(), engine.rgba_bytes())
        .context("frame buffer size does not match its dimensions")?;
    image
        .save(&args.out)
        .with_context(|| format!("writing {}", args.out.display()))?;
    info!("saved {}", args.out.display());

    Ok(())
}
