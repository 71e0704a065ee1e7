//! Kestrel - command-line ray tracer
//!
//! Loads an XML scene, renders it on a fixed pool of worker threads and
//! writes the result as PPM or any format the `image` crate knows.

mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kestrel_renderer::{build_scene, render, Background, Color, RenderConfig, StreamAssignment};

#[derive(Debug, Parser)]
#[command(name = "kestrel", version, about = "Whitted-style CPU ray tracer")]
struct Opt {
    /// Scene description to render
    #[arg(default_value = "data/scene.xml")]
    scene: PathBuf,

    /// Output image; `.ppm` is written as ASCII P3, other extensions via `image`
    #[arg(short, long, default_value = "output.ppm")]
    output: PathBuf,

    /// Worker threads (defaults to the available parallelism)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Samples per pixel
    #[arg(long, default_value_t = 1)]
    spp: u32,

    /// Maximum reflection depth
    #[arg(long, default_value_t = 10)]
    max_depth: u32,

    /// Shadow rays per light per shading point
    #[arg(long, default_value_t = 2)]
    shadow_samples: u32,

    /// Seed for the random sample streams
    #[arg(long)]
    seed: Option<u64>,

    /// Radiance for rays that escape: `black`, `sky` or `r,g,b`
    #[arg(long, default_value = "black", value_parser = parse_background)]
    background: Background,

    /// Radius given to every light; 0 keeps hard point-light shadows
    #[arg(long, default_value_t = 0.0)]
    light_radius: f32,

    /// How random streams are handed out
    #[arg(long, value_enum, default_value_t = Streams::PerRow)]
    streams: Streams,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Streams {
    /// One stream per image row; identical output for any thread count
    PerRow,
    /// One stream per worker
    PerWorker,
}

impl From<Streams> for StreamAssignment {
    fn from(streams: Streams) -> Self {
        match streams {
            Streams::PerRow => StreamAssignment::PerRow,
            Streams::PerWorker => StreamAssignment::PerWorker,
        }
    }
}

fn parse_background(s: &str) -> Result<Background, String> {
    match s {
        "black" => Ok(Background::Black),
        "sky" => Ok(Background::SkyGradient),
        _ => {
            let parts: Vec<&str> = s.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(format!("expected 'black', 'sky' or 'r,g,b', got '{}'", s));
            }
            let mut rgb = [0.0f32; 3];
            for (channel, part) in rgb.iter_mut().zip(&parts) {
                *channel = part
                    .parse()
                    .map_err(|_| format!("invalid color component '{}'", part))?;
            }
            Ok(Background::Solid(Color::from_array(rgb)))
        }
    }
}

impl Opt {
    fn render_config(&self) -> RenderConfig {
        let mut config = RenderConfig {
            samples_per_pixel: self.spp,
            max_depth: self.max_depth,
            shadow_samples: self.shadow_samples,
            background: self.background,
            streams: self.streams.into(),
            ..Default::default()
        };
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();

    let level = if opt.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    log::info!("Kestrel ray tracer starting");

    let description = kestrel_core::load_scene(&opt.scene)
        .with_context(|| format!("failed to load scene {:?}", opt.scene))?;
    let mut scene = build_scene(&description).context("failed to load scene")?;
    if opt.light_radius > 0.0 {
        scene.set_light_radius(opt.light_radius);
    }

    let config = opt.render_config();
    log::debug!("{:?}", config);

    let image = render(&scene, &config)?;

    output::save_image(&image, &opt.output)?;
    log::info!("Wrote {:?}", opt.output);

    Ok(())
}
