//! Scene file support for Kestrel.
//!
//! Scene files use a small XML dialect modelled on Mitsuba's:
//!
//! - `<camera type="perspective">` (or `<sensor>`) with `fov`, `width`,
//!   `height` and a `<lookat origin=".." target=".." up=".."/>`
//! - `<emitter type="point">` with `position` and `intensity`
//! - `<bsdf type="lambertian|diffuse|conductor" id="..">`
//! - `<shape type="sphere">` and `<shape type="ply">` with `<ref id=".."/>`
//!
//! Unknown elements and types are skipped with a warning.
//!
//! # Example
//!
//! ```ignore
//! use kestrel_core::scene_file::load_scene;
//!
//! let scene = load_scene("data/scene.xml")?;
//! println!("{} shapes, {} lights", scene.shape_count(), scene.emitter_count());
//! ```

mod types;
mod parser;
mod loader;

pub use types::*;
pub use parser::*;
pub use loader::*;
