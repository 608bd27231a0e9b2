//! Finding the visible chunks: a breadth-first flood fill outward from the
//! camera, and the reverse pass that drops active chunks the camera left.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use tracing::trace;

use infiniplot_coords::{CameraView, ChunkCoord, is_chunk_visible};

use crate::{ActiveChunks, SurfacePool};

/// Outcome of visiting one chunk during a flood fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit {
    /// The chunk overlaps the view; its neighbours were queued.
    Visible(ChunkCoord),
    /// The chunk is outside the view; the fill does not continue past it.
    Culled(ChunkCoord),
}

/// A resumable breadth-first flood fill over the chunk grid.
///
/// Starts from the chunk containing the camera and expands through
/// edge-adjacent neighbours of visible chunks. Because the visible region is a
/// convex rectangle, every visible chunk is reached, and the fill stops one
/// ring past the view. Each coordinate is queued at most once.
#[derive(Clone, Debug)]
pub struct FloodFill {
    chunk_size: f64,
    queue: VecDeque<ChunkCoord>,
    seen: FxHashSet<ChunkCoord>,
    visible: usize,
    culled: usize,
}

impl FloodFill {
    /// Start a fill seeded at the chunk containing the camera position.
    pub fn new(camera: &CameraView, chunk_size: f64) -> Self {
        Self::from_seed(ChunkCoord::containing(camera.position, chunk_size), chunk_size)
    }

    /// Start a fill from an explicit seed.
    pub fn from_seed(seed: ChunkCoord, chunk_size: f64) -> Self {
        let mut seen = FxHashSet::default();
        seen.insert(seed);
        Self {
            chunk_size,
            queue: VecDeque::from([seed]),
            seen,
            visible: 0,
            culled: 0,
        }
    }

    pub fn chunk_size(&self) -> f64 {
        self.chunk_size
    }

    /// Visit the next queued chunk. Returns `None` once the queue is empty.
    pub fn step(&mut self, camera: &CameraView) -> Option<Visit> {
        let coord = self.queue.pop_front()?;
        if !is_chunk_visible(camera, coord, self.chunk_size) {
            self.culled += 1;
            return Some(Visit::Culled(coord));
        }
        for neighbor in coord.neighbors() {
            if self.seen.insert(neighbor) {
                self.queue.push_back(neighbor);
            }
        }
        self.visible += 1;
        Some(Visit::Visible(coord))
    }

    pub fn is_done(&self) -> bool {
        self.queue.is_empty()
    }

    /// Chunks found visible so far.
    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// Chunks rejected so far.
    pub fn culled_count(&self) -> usize {
        self.culled
    }

    /// Coordinates waiting to be visited.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Run a flood fill to completion and return the visible chunks, sorted.
pub fn discover_visible(camera: &CameraView, chunk_size: f64) -> Vec<ChunkCoord> {
    let mut fill = FloodFill::new(camera, chunk_size);
    let mut found = Vec::new();
    while let Some(visit) = fill.step(camera) {
        if let Visit::Visible(coord) = visit {
            found.push(coord);
        }
    }
    found.sort_unstable();
    found
}

/// Release every active chunk that no longer overlaps the camera view.
///
/// Walks the active set in reverse coordinate order, so the smallest stale
/// coordinate is released last and is the first the pool hands back out.
/// Returns the number of chunks released. A no-op before the active set has
/// a chunk size.
pub fn cull_stale(active: &mut ActiveChunks, pool: &mut SurfacePool, camera: &CameraView) -> usize {
    let Some(chunk_size) = active.chunk_size() else {
        return 0;
    };
    let stale: Vec<ChunkCoord> = active
        .sorted_coords()
        .into_iter()
        .rev()
        .filter(|coord| !is_chunk_visible(camera, *coord, chunk_size))
        .collect();
    for coord in &stale {
        if let Some(drawable) = active.remove(*coord) {
            trace!(%coord, id = %drawable.id(), "culled chunk");
            pool.release(drawable);
        }
    }
    stale.len()
}
