//! Example: Load and inspect a scene file.
//!
//! Run with: cargo run -p kestrel_core --example inspect_scene -- scenes/spheres.xml

use std::env;

use kestrel_core::{load_ply, load_scene, BsdfKind, ShapeDescription};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_scene <path-to-scene-file>");
        println!("\nExample:");
        println!("  cargo run -p kestrel_core --example inspect_scene -- scenes/spheres.xml");
        return;
    }

    let path = &args[1];
    println!("Loading scene file: {}", path);

    let scene = match load_scene(path) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error loading scene file: {}", e);
            return;
        }
    };

    let camera = &scene.camera;
    println!("\n=== Scene: {} ===", scene.name);
    println!(
        "Camera: {}x{}, fov {:.1}, origin ({:.2}, {:.2}, {:.2}) -> target ({:.2}, {:.2}, {:.2})",
        camera.width,
        camera.height,
        camera.fov,
        camera.origin.x,
        camera.origin.y,
        camera.origin.z,
        camera.target.x,
        camera.target.y,
        camera.target.z
    );

    println!("\n--- BSDFs ---");
    for bsdf in &scene.bsdfs {
        match &bsdf.kind {
            BsdfKind::Lambertian { color } => println!(
                "  {} - lambertian ({:.2}, {:.2}, {:.2})",
                bsdf.id, color.x, color.y, color.z
            ),
            BsdfKind::Conductor { eta } => println!(
                "  {} - conductor ({:.2}, {:.2}, {:.2})",
                bsdf.id, eta.x, eta.y, eta.z
            ),
        }
    }

    println!("\n--- Shapes ---");
    for (i, shape) in scene.shapes.iter().enumerate() {
        let bsdf = shape.bsdf_ref().unwrap_or("<default>");
        match shape {
            ShapeDescription::Sphere { center, radius, .. } => println!(
                "  [{}] sphere at ({:.2}, {:.2}, {:.2}), r = {:.2}, bsdf {}",
                i, center.x, center.y, center.z, radius, bsdf
            ),
            ShapeDescription::Ply { filename, .. } => match load_ply(filename) {
                Ok(mesh) => {
                    println!(
                        "  [{}] mesh {:?} - {} vertices, {} triangles, bsdf {}",
                        i,
                        filename,
                        mesh.vertex_count(),
                        mesh.triangle_count(),
                        bsdf
                    );
                    if let Some((min, max)) = mesh.bounds() {
                        println!(
                            "       Bounds: ({:.2}, {:.2}, {:.2}) to ({:.2}, {:.2}, {:.2})",
                            min.x, min.y, min.z, max.x, max.y, max.z
                        );
                    }
                }
                Err(e) => println!("  [{}] mesh {:?} - failed to load: {}", i, filename, e),
            },
        }
    }

    println!("\n--- Emitters ---");
    for (i, emitter) in scene.emitters.iter().enumerate() {
        println!(
            "  [{}] point at ({:.2}, {:.2}, {:.2}), intensity ({:.2}, {:.2}, {:.2})",
            i,
            emitter.position.x,
            emitter.position.y,
            emitter.position.z,
            emitter.intensity.x,
            emitter.intensity.y,
            emitter.intensity.z
        );
    }
}
