//! Integer addresses of cells in the world chunk grid.

use std::fmt;

use glam::DVec2;

use crate::Aabb2;

/// Identifies a chunk's cell in the world grid.
///
/// The chunk at `(x, y)` is centred on `(x · S, y · S)` for chunk size `S`
/// and covers half a chunk on each side of that center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk-grid X coordinate.
    pub x: i64,
    /// Chunk-grid Y coordinate.
    pub y: i64,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate offset by `(dx, dy)`.
    pub fn offset(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four edge-adjacent neighbours: +X, -X, +Y, -Y.
    pub fn neighbors(self) -> [Self; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }

    /// The chunk whose extent contains `position`.
    ///
    /// Chunks are centred on multiples of `chunk_size`, so this rounds
    /// `position / chunk_size` to the nearest integer (ties go up).
    pub fn containing(position: DVec2, chunk_size: f64) -> Self {
        debug_assert!(chunk_size > 0.0, "chunk size must be positive");
        let cell = (position / chunk_size + DVec2::splat(0.5)).floor();
        Self {
            x: cell.x as i64,
            y: cell.y as i64,
        }
    }

    /// World-space center of this chunk.
    pub fn center(self, chunk_size: f64) -> DVec2 {
        DVec2::new(self.x as f64 * chunk_size, self.y as f64 * chunk_size)
    }

    /// World-space bounds of this chunk.
    pub fn bounds(self, chunk_size: f64) -> Aabb2 {
        Aabb2::from_center_half_extents(self.center(chunk_size), DVec2::splat(chunk_size * 0.5))
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
