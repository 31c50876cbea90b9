//! geom-export library
//!
//! Manifest parsing and OBJ output for generated primitive geometry, for use
//! by other tools that want to bake shapes to disk.

pub mod manifest;
pub mod obj;

pub use manifest::{Manifest, ShapeEntry, build_all, check, load_manifest};
pub use obj::{ObjWriter, write_obj};
