//! Parallel scanline renderer.
//!
//! Workers claim whole rows from a shared atomic counter until every row
//! is taken. Each worker owns one generator, and each row is written by
//! exactly one worker into its own slice of the pixel buffer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::integrator::{ray_color, Background};
use crate::scene::Scene;
use kestrel_math::{gen_f32, Color, Pcg32};
use rand::{RngCore, SeedableRng};
use thiserror::Error;

/// Rows between progress messages.
const PROGRESS_INTERVAL: usize = 50;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 0x853c_49e6_748f_ea9b;

/// Errors that can occur when starting a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Samples per pixel must be at least 1")]
    NoSamples,

    #[error("Failed to start render threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// How workers derive their random sample streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamAssignment {
    /// Every row gets its own stream derived from the seed and the row
    /// index. Output is identical for any thread count.
    #[default]
    PerRow,

    /// Every worker gets one stream, seeded from a draw of a shared
    /// generator plus the worker index. Output depends on the thread count
    /// and on which worker claims which row.
    PerWorker,
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Shadow rays per light per shading point
    pub shadow_samples: u32,
    /// Worker threads
    pub threads: usize,
    /// Seed for every random stream
    pub seed: u64,
    /// Radiance for rays that leave the scene
    pub background: Background,
    pub streams: StreamAssignment,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 1,
            max_depth: 10,
            shadow_samples: 2,
            threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
            seed: DEFAULT_SEED,
            background: Background::Black,
            streams: StreamAssignment::PerRow,
        }
    }
}

/// Apply gamma correction (gamma = 2.2).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.powf(1.0 / 2.2)
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    // Apply gamma correction and convert to 0-255
    let r = (255.99 * clamp_01(linear_to_gamma(color.x))) as u8;
    let g = (255.99 * clamp_01(linear_to_gamma(color.y))) as u8;
    let b = (255.99 * clamp_01(linear_to_gamma(color.z))) as u8;
    [r, g, b, 255]
}

/// Render a single pixel with multi-sampling.
///
/// `(i, j)` is column and row, with row 0 at the bottom of the image.
pub fn render_pixel(
    scene: &Scene,
    i: u32,
    j: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let camera = scene.camera();
    let width = camera.image_width as f32;
    let height = camera.image_height as f32;
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        // Jitter within the pixel footprint
        let u = (i as f32 + gen_f32(rng)) / width;
        let v = (j as f32 + gen_f32(rng)) / height;
        let ray = camera.get_ray(u, v);
        pixel_color += ray_color(&ray, scene, config.max_depth, config, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel.max(1) as f32
}

/// Linear radiance per pixel, row-major with row 0 at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Pixels of row `y`.
    pub fn row(&self, y: u32) -> &[Color] {
        let start = self.index(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Gamma-corrected RGBA bytes, top row first (for display or saving).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for y in (0..self.height).rev() {
            for color in self.row(y) {
                bytes.extend_from_slice(&color_to_rgba(*color));
            }
        }
        bytes
    }
}

/// Generator for one row under [`StreamAssignment::PerRow`].
fn row_rng(seed: u64, row: usize) -> Pcg32 {
    Pcg32::new(seed, row as u64)
}

/// Render the entire scene to an image buffer.
///
/// Runs on a pool of exactly `config.threads` workers built for this call
/// and returns once every row is finished.
pub fn render(scene: &Scene, config: &RenderConfig) -> Result<ImageBuffer, RenderError> {
    let camera = scene.camera();
    let (width, height) = (camera.image_width, camera.image_height);
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyImage { width, height });
    }
    if config.samples_per_pixel == 0 {
        return Err(RenderError::NoSamples);
    }

    let threads = config.threads.max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("kestrel-worker-{i}"))
        .build()?;

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}, {} shadow samples on {} threads",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth,
        config.shadow_samples,
        threads
    );
    let start = Instant::now();

    let mut image = ImageBuffer::new(width, height);
    // One slot per row; a row is only ever locked by the worker that claimed it
    let rows: Vec<Mutex<&mut [Color]>> = image
        .pixels
        .chunks_mut(width as usize)
        .map(Mutex::new)
        .collect();

    let next_row = AtomicUsize::new(0);
    let rows_done = AtomicUsize::new(0);

    let mut seeder = Pcg32::seed_from_u64(config.seed);
    let worker_seeds: Vec<u64> = (0..threads)
        .map(|worker| u64::from(seeder.gen_u32()) + worker as u64)
        .collect();

    pool.scope(|s| {
        for (worker, &worker_seed) in worker_seeds.iter().enumerate() {
            let rows = &rows;
            let next_row = &next_row;
            let rows_done = &rows_done;

            s.spawn(move |_| {
                let mut rng = Pcg32::seed_from_u64(worker_seed);

                loop {
                    let j = next_row.fetch_add(1, Ordering::Relaxed);
                    if j >= rows.len() {
                        break;
                    }

                    if config.streams == StreamAssignment::PerRow {
                        rng = row_rng(config.seed, j);
                    }

                    let mut row = rows[j].lock().unwrap_or_else(PoisonError::into_inner);
                    for (i, pixel) in row.iter_mut().enumerate() {
                        *pixel = render_pixel(scene, i as u32, j as u32, config, &mut rng);
                    }
                    drop(row);

                    let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
                    if done % PROGRESS_INTERVAL == 0 {
                        log::info!("Scanline {}/{}", done, height);
                    }
                }

                log::debug!("Worker {} finished", worker);
            });
        }
    });
    drop(rows);

    log::info!("Rendered in {:.2?}", start.elapsed());

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Camera, Light, Material, Sphere};
    use kestrel_math::Vec3;

    /// Sphere of radius 0.5 at (0, 0, -1) lit from (2, 4, 1), camera at the
    /// origin looking down -Z with a 90 degree fov.
    fn sphere_scene(width: u32, height: u32) -> Scene {
        let camera = Camera::new()
            .with_resolution(width, height)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_fov(90.0);
        let mut scene = Scene::new(camera);
        let grey = scene.add_material(Material::diffuse(Color::splat(0.5)));
        let mirror = scene.add_material(Material::specular(Color::splat(0.8)));
        scene.add_shape(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey));
        scene.add_shape(Sphere::new(Vec3::new(-1.2, 0.0, -1.5), 0.5, mirror));
        scene.add_light(Light::point(Vec3::new(2.0, 4.0, 1.0), Color::ONE).with_radius(0.3));
        scene
    }

    fn config(threads: usize) -> RenderConfig {
        RenderConfig {
            samples_per_pixel: 4,
            threads,
            seed: 1234,
            ..Default::default()
        }
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.5) - 0.5f32.powf(1.0 / 2.2)).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Color::ZERO), [0, 0, 0, 255]);
        assert_eq!(color_to_rgba(Color::ONE), [255, 255, 255, 255]);
        assert_eq!(color_to_rgba(Color::splat(7.5)), [255, 255, 255, 255]);
        assert_eq!(color_to_rgba(Color::splat(-1.0)), [0, 0, 0, 255]);
    }

    #[test]
    fn test_image_buffer_rows_are_flipped() {
        let mut image = ImageBuffer::new(2, 2);
        image.set(0, 0, Color::ONE); // bottom-left
        image.set(1, 1, Color::new(1.0, 0.0, 0.0)); // top-right

        assert_eq!(image.get(0, 0), Color::ONE);
        assert_eq!(image.row(1)[1], Color::new(1.0, 0.0, 0.0));

        let bytes = image.to_rgba8();
        assert_eq!(bytes.len(), 16);
        // Top row first: (0, 1) black then (1, 1) red
        assert_eq!(&bytes[0..8], &[0, 0, 0, 255, 255, 0, 0, 255]);
        // Bottom row: (0, 0) white then (1, 0) black
        assert_eq!(&bytes[8..16], &[255, 255, 255, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn test_render_pixel_center_and_corner() {
        let scene = sphere_scene(11, 11);
        let config = config(1);
        let mut rng = Pcg32::seed_from_u64(42);

        // Center pixel hits the grey sphere facing the light
        let center = render_pixel(&scene, 5, 5, &config, &mut rng);
        assert!(center.length() > 0.0);

        // Top-right corner looks past everything
        let corner = render_pixel(&scene, 10, 10, &config, &mut rng);
        assert_eq!(corner, Color::ZERO);
    }

    #[test]
    fn test_render_fills_buffer() {
        let scene = sphere_scene(16, 12);
        let image = render(&scene, &config(2)).unwrap();

        assert_eq!(image.width, 16);
        assert_eq!(image.height, 12);
        assert_eq!(image.pixels.len(), 16 * 12);
        assert!(image.get(8, 6).length() > 0.0);
        assert_eq!(image.get(15, 11), Color::ZERO);
        assert!(image.pixels.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_thread_count_does_not_change_output() {
        let scene = sphere_scene(24, 16);
        let single = render(&scene, &config(1)).unwrap();

        for threads in [2, 3, 8] {
            let multi = render(&scene, &config(threads)).unwrap();
            assert_eq!(single, multi, "{threads} threads diverged");
        }
    }

    #[test]
    fn test_per_worker_streams_are_reproducible() {
        let scene = sphere_scene(8, 8);
        let config = RenderConfig {
            streams: StreamAssignment::PerWorker,
            ..config(1)
        };

        let a = render(&scene, &config).unwrap();
        let b = render(&scene, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_changes_noise() {
        let scene = sphere_scene(16, 16);
        let a = render(&scene, &config(2)).unwrap();
        let b = render(
            &scene,
            &RenderConfig {
                seed: 99,
                ..config(2)
            },
        )
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_configs() {
        let scene = sphere_scene(0, 10);
        assert!(matches!(
            render(&scene, &config(1)),
            Err(RenderError::EmptyImage { width: 0, height: 10 })
        ));

        let scene = sphere_scene(4, 4);
        let no_samples = RenderConfig {
            samples_per_pixel: 0,
            ..config(1)
        };
        assert!(matches!(render(&scene, &no_samples), Err(RenderError::NoSamples)));
    }
}
