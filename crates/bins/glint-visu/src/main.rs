use base::{
    cli::{log_launch, parse_args, setup_logging},
    envmap::{CubeMap, GradientSky},
};
use clap::Parser;
use glint_visu::{
    config::{RenderConfig, SceneKind},
    render::Renderer,
    scene::SharedEnv,
    scenes, VisuError,
};
use std::{path::PathBuf, sync::Arc, time::Instant};

#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(next_line_help = true)]
struct Args {
    /// Path to a TOML configuration file; command line flags take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Scene to render.
    #[arg(long, value_enum)]
    scene: Option<SceneKind>,
    /// Image width in pixels.
    #[arg(long)]
    width: Option<u32>,
    /// Image height in pixels.
    #[arg(long)]
    height: Option<u32>,
    /// Number of frames to render.
    #[arg(short, long)]
    frames: Option<u32>,
    /// Camera orbit step between frames, in degrees.
    #[arg(long)]
    orbit_step: Option<f32>,
    /// Factor applied to the camera distance between frames.
    #[arg(long)]
    dolly: Option<f32>,
    /// Output directory of the frames.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Seed of the sphere placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Skybox face images, ordered +X -X +Y -Y +Z -Z.
    #[arg(long, num_args = 6, value_names = ["PX", "NX", "PY", "NY", "PZ", "NZ"])]
    skybox: Option<Vec<PathBuf>>,
    /// Cube camera face resolution.
    #[arg(long)]
    probe_resolution: Option<u32>,
    /// Verbosity: 0 error, 1 warn, 2 info, 3 debug, 4 trace.
    #[arg(short, long, default_value_t = 2)]
    log_level: u8,
}

impl Args {
    fn apply(self, config: &mut RenderConfig) {
        if let Some(scene) = self.scene {
            config.scene = scene;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(frames) = self.frames {
            config.frames = frames;
        }
        if let Some(step) = self.orbit_step {
            config.orbit_step = step;
        }
        if let Some(factor) = self.dolly {
            config.dolly_factor = factor;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(faces) = self.skybox.and_then(|faces| <[PathBuf; 6]>::try_from(faces).ok()) {
            config.skybox = Some(faces);
        }
        if let Some(res) = self.probe_resolution {
            config.probe_resolution = res;
        }
    }
}

fn main() {
    let (args, launch_time) = parse_args::<Args>();
    setup_logging(Some(launch_time), args.log_level, &[]);
    log_launch("glint-visu", launch_time);
    if let Err(err) = run(args) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), VisuError> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;
    log::debug!("{:?}", config);

    let background: SharedEnv = match &config.skybox {
        Some(faces) => {
            let map = CubeMap::load(faces)?;
            log::info!("Loaded {}px skybox", map.size());
            Arc::new(map)
        },
        None => {
            log::info!("No skybox configured, using the procedural sky");
            Arc::new(GradientSky::default())
        },
    };

    let mut stage = scenes::build(&config, background)?;

    std::fs::create_dir_all(&config.output_dir)?;
    let mut renderer = Renderer::new(config.tile_size);
    for frame in 0..config.frames {
        let start = Instant::now();
        let frame_image = renderer.frame(
            &mut stage.scene,
            &mut stage.camera,
            (config.width, config.height),
        )?;
        let path = config
            .output_dir
            .join(format!("{}-{:04}.png", config.scene, frame));
        frame_image.save_with_format(&path, image::ImageFormat::Png)?;
        log::info!(
            "Frame {}/{} rendered in {:.2?} -> {}",
            frame + 1,
            config.frames,
            start.elapsed(),
            path.display()
        );
        stage.advance(config.orbit_step, config.dolly_factor);
    }
    Ok(())
}
