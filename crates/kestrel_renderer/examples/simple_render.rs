//! Simple ray tracer example.
//!
//! Renders a basic scene with spheres and a mirror floor and saves it in
//! PPM format.
//!
//! Run with: cargo run -p kestrel_renderer --example simple_render --release

use kestrel_renderer::{
    render, Background, Camera, Color, ImageBuffer, Light, Material, Mesh, RenderConfig, Scene,
    Sphere, Triangle, Vec3,
};
use std::fs::File;
use std::io::{BufWriter, Write};

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    println!("Kestrel Ray Tracer - Simple Example");
    println!("===================================");

    // Build the scene
    let start = std::time::Instant::now();
    let scene = build_scene();
    println!(
        "Scene built in {:?}: {} shapes, {} lights",
        start.elapsed(),
        scene.shapes().len(),
        scene.lights().len()
    );

    // Render configuration
    let config = RenderConfig {
        samples_per_pixel: 16,
        max_depth: 10,
        background: Background::SkyGradient,
        ..Default::default()
    };

    let camera = scene.camera();
    println!(
        "Rendering {}x{} @ {} spp on {} threads...",
        camera.image_width, camera.image_height, config.samples_per_pixel, config.threads
    );

    // Render
    let start = std::time::Instant::now();
    let image = match render(&scene, &config) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Render failed: {}", e);
            return;
        }
    };
    println!("Rendered in {:?}", start.elapsed());

    // Save as PPM
    let filename = "output.ppm";
    match save_ppm(&image, filename) {
        Ok(()) => println!("Saved to {}", filename),
        Err(e) => eprintln!("Failed to save image: {}", e),
    }
}

fn build_scene() -> Scene {
    let camera = Camera::new()
        .with_resolution(640, 360)
        .with_position(
            Vec3::new(0.0, 1.0, 3.0),  // look_from
            Vec3::new(0.0, 0.3, -1.0), // look_at
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_fov(50.0);
    let mut scene = Scene::new(camera);

    let floor = scene.add_material(Material::diffuse(Color::new(0.6, 0.6, 0.6)));
    let red = scene.add_material(Material::diffuse(Color::new(0.8, 0.15, 0.1)));
    let blue = scene.add_material(Material::diffuse(Color::new(0.1, 0.2, 0.8)));
    let mirror = scene.add_material(Material::specular(Color::new(0.9, 0.9, 0.9)));

    // Ground quad made of two triangles
    let corners = [
        Vec3::new(-10.0, 0.0, 10.0),
        Vec3::new(10.0, 0.0, 10.0),
        Vec3::new(10.0, 0.0, -10.0),
        Vec3::new(-10.0, 0.0, -10.0),
    ];
    let ground = Mesh::from_triangles(
        vec![
            Triangle::new(corners[0], corners[1], corners[2], floor),
            Triangle::new(corners[0], corners[2], corners[3], floor),
        ],
        floor,
    );
    scene.add_shape(ground);

    // Three spheres, the middle one a mirror
    scene.add_shape(Sphere::new(Vec3::new(-1.1, 0.5, -1.0), 0.5, red));
    scene.add_shape(Sphere::new(Vec3::new(0.0, 0.5, -1.5), 0.5, mirror));
    scene.add_shape(Sphere::new(Vec3::new(1.1, 0.5, -1.0), 0.5, blue));

    scene.add_light(Light::point(Vec3::new(2.0, 4.0, 1.0), Color::splat(40.0)).with_radius(0.25));
    scene.add_light(Light::point(Vec3::new(-3.0, 2.0, 2.0), Color::splat(10.0)));

    scene
}

fn save_ppm(image: &ImageBuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for rgba in image.to_rgba8().chunks_exact(4) {
        writeln!(writer, "{} {} {}", rgba[0], rgba[1], rgba[2])?;
    }

    writer.flush()
}
