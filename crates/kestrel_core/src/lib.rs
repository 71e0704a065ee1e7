//! Kestrel Core - Scene description and file loading.
//!
//! This crate provides:
//!
//! - **Scene description types**: `SceneDescription`, `CameraDescription`,
//!   `BsdfDescription`, `ShapeDescription`, `EmitterDescription`
//! - **Scene files**: XML scene file parsing and loading
//! - **Meshes**: ASCII PLY loading into `MeshData`
//!
//! # Example
//!
//! ```ignore
//! use kestrel_core::load_scene;
//!
//! let scene = load_scene("scenes/spheres.xml")?;
//! println!("Loaded {} shapes, {} emitters",
//!     scene.shape_count(),
//!     scene.emitter_count());
//! ```

pub mod mesh;
pub mod ply;
pub mod scene;
pub mod scene_file;

// Re-export commonly used types
pub use mesh::MeshData;
pub use ply::{load_ply, parse_ply_str, PlyError};
pub use scene::{
    BsdfDescription, BsdfKind, CameraDescription, EmitterDescription, MeshTransform,
    SceneDescription, ShapeDescription,
};
pub use scene_file::{load_scene, parse_scene_str, ParseError};
