//! Turn a scene description into a renderable [`Scene`].
//!
//! Resolves BSDF references to material ids, loads PLY meshes and applies
//! their one-time transforms. Everything here happens before rendering
//! starts.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::camera::Camera;
use crate::light::Light;
use crate::material::{Material, MaterialId};
use crate::mesh::Mesh;
use crate::scene::Scene;
use crate::sphere::Sphere;
use kestrel_core::{load_ply, BsdfKind, PlyError, SceneDescription, ShapeDescription};
use kestrel_math::Color;
use thiserror::Error;

/// Albedo given to spheres without a usable BSDF.
pub const DEFAULT_SPHERE_ALBEDO: Color = Color::ZERO;

/// Albedo given to meshes without a usable BSDF.
pub const DEFAULT_MESH_ALBEDO: Color = Color::splat(0.5);

/// Errors that can occur while building a scene.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Failed to load mesh {path:?}: {source}")]
    Mesh {
        path: PathBuf,
        #[source]
        source: PlyError,
    },
}

/// Result type for scene building.
pub type BuildResult<T> = Result<T, BuildError>;

/// Build a scene from its description.
///
/// Mesh paths are opened as given; [`kestrel_core::load_scene`] has already
/// made them relative to the scene file.
pub fn build_scene(desc: &SceneDescription) -> BuildResult<Scene> {
    let mut scene = Scene::new(Camera::from(&desc.camera));

    // Later definitions of the same id win
    let mut by_id: HashMap<&str, MaterialId> = HashMap::new();
    for bsdf in &desc.bsdfs {
        let material = match bsdf.kind {
            BsdfKind::Lambertian { color } => Material::diffuse(color),
            BsdfKind::Conductor { eta } => Material::specular(eta),
        };
        by_id.insert(bsdf.id.as_str(), scene.add_material(material));
    }

    let mut defaults = DefaultMaterials::default();

    for shape in &desc.shapes {
        let material = match shape.bsdf_ref() {
            Some(id) => match by_id.get(id) {
                Some(&material) => material,
                None => {
                    log::warn!("Unknown bsdf '{}', using the default material", id);
                    defaults.for_shape(shape, &mut scene)
                }
            },
            None => defaults.for_shape(shape, &mut scene),
        };

        match shape {
            ShapeDescription::Sphere { center, radius, .. } => {
                scene.add_shape(Sphere::new(*center, *radius, material));
            }
            ShapeDescription::Ply {
                filename,
                transform,
                ..
            } => {
                let data = load_ply(filename).map_err(|source| BuildError::Mesh {
                    path: filename.clone(),
                    source,
                })?;

                let mut mesh = Mesh::from_data(&data, material);
                if let Some(transform) = transform {
                    mesh.scale(transform.scale);
                    mesh.translate(transform.translate);
                }

                if mesh.is_empty() {
                    log::warn!("Mesh {:?} has no triangles", filename);
                }
                scene.add_shape(mesh);
            }
        }
    }

    for emitter in &desc.emitters {
        scene.add_light(Light::point(emitter.position, emitter.intensity));
    }

    if scene.lights().is_empty() {
        log::warn!("Scene has no lights; only reflections of the background will be visible");
    }

    log::info!(
        "Built scene: {} materials, {} shapes ({} triangles), {} lights",
        scene.materials().len(),
        scene.shapes().len(),
        scene.triangle_count(),
        scene.lights().len()
    );

    Ok(scene)
}

/// Fallback materials, created on first use.
#[derive(Default)]
struct DefaultMaterials {
    sphere: Option<MaterialId>,
    mesh: Option<MaterialId>,
}

impl DefaultMaterials {
    fn for_shape(&mut self, shape: &ShapeDescription, scene: &mut Scene) -> MaterialId {
        let (slot, albedo) = match shape {
            ShapeDescription::Sphere { .. } => (&mut self.sphere, DEFAULT_SPHERE_ALBEDO),
            ShapeDescription::Ply { .. } => (&mut self.mesh, DEFAULT_MESH_ALBEDO),
        };
        *slot.get_or_insert_with(|| {
            log::debug!("Adding default material {:?}", albedo);
            scene.add_material(Material::diffuse(albedo))
        })
    }
}
