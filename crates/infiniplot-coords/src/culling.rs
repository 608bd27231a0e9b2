//! Chunk visibility against the orthographic camera frustum.
//!
//! The camera never rotates, so the frustum is an axis-aligned rectangle in
//! camera-relative space and culling reduces to a 2D AABB overlap test.

use glam::DVec2;

use crate::{Aabb2, CameraView, ChunkCoord};

/// Camera-relative bounds of the visible region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum2 {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Frustum2 {
    /// The frustum as a box in camera-relative space.
    pub fn as_aabb(&self) -> Aabb2 {
        Aabb2::new(
            DVec2::new(self.left, self.bottom),
            DVec2::new(self.right, self.top),
        )
    }

    /// Test a camera-relative box against the frustum.
    pub fn intersects(&self, local: &Aabb2) -> bool {
        self.as_aabb().overlaps(local)
    }
}

/// Decide whether the chunk at `coord` is visible from `camera`.
///
/// The chunk box is moved into camera-relative space and must overlap the
/// frustum on both axes. Edge contact alone is not visible; a chunk that
/// contains the whole frustum on an axis overlaps on that axis.
pub fn is_chunk_visible(camera: &CameraView, coord: ChunkCoord, chunk_size: f64) -> bool {
    let local = coord
        .bounds(chunk_size)
        .translated(-camera.position);
    camera.frustum().intersects(&local)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(x: f64, y: f64, view_size: f64, aspect: f64) -> CameraView {
        CameraView::new(DVec2::new(x, y), view_size, aspect)
    }

    #[test]
    fn test_chunk_fully_inside_is_visible() {
        let cam = camera(0.0, 0.0, 10.0, 1.0);
        assert!(is_chunk_visible(&cam, ChunkCoord::new(0, 0), 1.0));
        assert!(is_chunk_visible(&cam, ChunkCoord::new(-5, 4), 1.0));
    }

    #[test]
    fn test_chunk_without_overlap_is_culled() {
        let cam = camera(0.0, 0.0, 3.0, 1.0);
        assert!(!is_chunk_visible(&cam, ChunkCoord::new(5, 5), 1.0));
        // Overlaps on Y but not X.
        assert!(!is_chunk_visible(&cam, ChunkCoord::new(5, 0), 1.0));
        // Overlaps on X but not Y.
        assert!(!is_chunk_visible(&cam, ChunkCoord::new(0, -5), 1.0));
    }

    #[test]
    fn test_chunk_containing_frustum_is_visible() {
        let cam = camera(0.2, -0.1, 0.5, 1.0);
        assert!(is_chunk_visible(&cam, ChunkCoord::new(0, 0), 100.0));
    }

    #[test]
    fn test_chunk_spanning_frustum_on_one_axis_is_visible() {
        // 2x2 chunks, frustum half-height 0.5: chunk at y=0 spans [-1, 1],
        // containing the frustum's Y range; X overlaps partially.
        let cam = camera(0.0, 0.0, 0.5, 4.0);
        assert!(is_chunk_visible(&cam, ChunkCoord::new(0, 0), 2.0));
        assert!(is_chunk_visible(&cam, ChunkCoord::new(1, 0), 2.0));
        assert!(!is_chunk_visible(&cam, ChunkCoord::new(0, 1), 2.0));
    }

    #[test]
    fn test_touching_edge_is_culled() {
        // Frustum right edge at x = 3, chunk 2 starts at x = 3.
        let cam = camera(0.0, 0.0, 3.0, 1.0);
        assert!(is_chunk_visible(&cam, ChunkCoord::new(1, 0), 2.0));
        assert!(!is_chunk_visible(&cam, ChunkCoord::new(2, 0), 2.0));
    }

    #[test]
    fn test_camera_offset_moves_frustum() {
        let cam = camera(10.0, 0.0, 1.0, 1.0);
        assert!(is_chunk_visible(&cam, ChunkCoord::new(10, 0), 1.0));
        assert!(!is_chunk_visible(&cam, ChunkCoord::new(0, 0), 1.0));
    }

    #[test]
    fn test_aspect_widens_horizontally() {
        let narrow = camera(0.0, 0.0, 1.0, 1.0);
        let wide = camera(0.0, 0.0, 1.0, 3.0);
        let coord = ChunkCoord::new(2, 0);
        assert!(!is_chunk_visible(&narrow, coord, 1.0));
        assert!(is_chunk_visible(&wide, coord, 1.0));
    }

    #[test]
    fn test_same_state_gives_same_answer() {
        let before = camera(0.37, -1.21, 2.0, 1.5);
        let elsewhere = camera(40.0, 12.0, 9.0, 1.5);
        let after = camera(0.37, -1.21, 2.0, 1.5);
        for x in -4..=4 {
            for y in -4..=4 {
                let c = ChunkCoord::new(x, y);
                let first = is_chunk_visible(&before, c, 1.0);
                let _ = is_chunk_visible(&elsewhere, c, 1.0);
                assert_eq!(first, is_chunk_visible(&after, c, 1.0), "chunk {c}");
            }
        }
    }
}
