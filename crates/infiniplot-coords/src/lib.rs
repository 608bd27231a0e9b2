//! World-space coordinate types for the chunk grid: chunk addresses,
//! axis-aligned boxes, the camera view and its frustum, and the visibility
//! test that decides which chunks the camera can see.

mod aabb;
mod camera;
mod chunk;
mod culling;

pub use aabb::Aabb2;
pub use camera::CameraView;
pub use chunk::ChunkCoord;
pub use culling::{Frustum2, is_chunk_visible};

pub use glam::DVec2;
