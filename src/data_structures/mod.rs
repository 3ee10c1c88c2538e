//! Engine data structures: models, textures, scene graphs, and instances.
//!
//! This module contains the core data types for scene representation:
//!
//! - `colour` converts authored sRGB colours to linear space
//! - `instance` holds per-instance transformation data and fixed placements
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `primitives` generates box, cylinder and cone geometry
//! - `scene_graph` enables hierarchical scene organization
//! - `texture` contains GPU texture wrapper and creation utilities

pub mod colour;
pub mod instance;
pub mod model;
pub mod primitives;
pub mod scene_graph;
pub mod texture;
