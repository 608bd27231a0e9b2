//! Incremental chunk streaming for an infinite function plot.
//!
//! The plane is cut into square chunks sized from the camera's zoom level.
//! Each camera change starts a [`StreamingTask`] that releases chunks the
//! camera no longer sees, flood-fills outward from the camera to find the
//! visible chunks, and renders the missing ones into surfaces taken from a
//! [`SurfacePool`]. Tasks run in budgeted slices so a frame never stalls on a
//! large rebuild; [`ChunkStreamer`] owns the pool, the active set and the
//! current task, and is what a host frame loop drives.

mod active;
mod discovery;
mod drawable;
mod equation;
mod pool;
mod streamer;
mod task;

pub use active::ActiveChunks;
pub use discovery::{FloodFill, Visit, cull_stale, discover_visible};
pub use drawable::{ChunkDrawable, SurfaceId};
pub use equation::Equation;
pub use pool::{PoolStats, SurfaceFactory, SurfacePool};
pub use streamer::{ChunkStreamer, StreamStatus, StreamerConfig};
pub use task::{SliceBudget, StreamingTask, TaskContext, TaskPhase, TaskStats, TaskStatus};
