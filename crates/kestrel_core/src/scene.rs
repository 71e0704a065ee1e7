//! Scene description types for Kestrel.
//!
//! These mirror the scene file closely and stay renderer-agnostic: materials
//! are referenced by string id and meshes by file path. The renderer resolves
//! both when it builds its own scene.

use std::path::{Path, PathBuf};

use kestrel_math::Vec3;

/// Pinhole camera parameters as written in the scene file.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraDescription {
    /// Vertical field of view in degrees
    pub fov: f32,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Eye position
    pub origin: Vec3,

    /// Point the camera looks at
    pub target: Vec3,

    /// Approximate up direction
    pub up: Vec3,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            fov: 90.0,
            width: 768,
            height: 576,
            origin: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }
}

impl CameraDescription {
    /// Image aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Surface model of a BSDF definition.
#[derive(Clone, Debug, PartialEq)]
pub enum BsdfKind {
    /// Diffuse reflector with the given albedo (RGB, 0-1)
    Lambertian { color: Vec3 },

    /// Perfect mirror tinted by `eta`
    Conductor { eta: Vec3 },
}

/// A named BSDF that shapes can reference.
#[derive(Clone, Debug, PartialEq)]
pub struct BsdfDescription {
    pub id: String,
    pub kind: BsdfKind,
}

impl BsdfDescription {
    pub fn new(id: impl Into<String>, kind: BsdfKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// One-time transform applied to a mesh after loading (scale, then translate).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshTransform {
    pub scale: Vec3,
    pub translate: Vec3,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            translate: Vec3::ZERO,
        }
    }
}

/// Geometry entries of the scene file.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeDescription {
    Sphere {
        center: Vec3,
        radius: f32,
        bsdf_ref: Option<String>,
    },
    Ply {
        filename: PathBuf,
        bsdf_ref: Option<String>,
        transform: Option<MeshTransform>,
    },
}

impl ShapeDescription {
    /// The referenced BSDF id, if any.
    pub fn bsdf_ref(&self) -> Option<&str> {
        match self {
            ShapeDescription::Sphere { bsdf_ref, .. } | ShapeDescription::Ply { bsdf_ref, .. } => {
                bsdf_ref.as_deref()
            }
        }
    }
}

/// A point light.
#[derive(Clone, Debug, PartialEq)]
pub struct EmitterDescription {
    pub position: Vec3,

    /// Unitless RGB intensity
    pub intensity: Vec3,
}

impl Default for EmitterDescription {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            intensity: Vec3::ONE,
        }
    }
}

/// Everything a scene file describes.
#[derive(Clone, Debug, Default)]
pub struct SceneDescription {
    /// Scene name (usually from filename)
    pub name: String,

    pub camera: CameraDescription,

    /// BSDFs in file order
    pub bsdfs: Vec<BsdfDescription>,

    /// Shapes in file order
    pub shapes: Vec<ShapeDescription>,

    /// Point lights in file order
    pub emitters: Vec<EmitterDescription>,
}

impl SceneDescription {
    /// Create an empty description around a camera.
    pub fn new(camera: CameraDescription) -> Self {
        Self {
            camera,
            ..Default::default()
        }
    }

    /// Look up a BSDF by id. Later definitions shadow earlier ones.
    pub fn find_bsdf(&self, id: &str) -> Option<&BsdfDescription> {
        self.bsdfs.iter().rev().find(|bsdf| bsdf.id == id)
    }

    /// Make relative mesh paths relative to `base_dir` (the scene file's directory).
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        for shape in &mut self.shapes {
            if let ShapeDescription::Ply { filename, .. } = shape {
                if filename.is_relative() {
                    *filename = base_dir.join(&*filename);
                }
            }
        }
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    pub fn bsdf_count(&self) -> usize {
        self.bsdfs.len()
    }
}
