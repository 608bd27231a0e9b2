use glam::DVec2;

use crate::Frustum2;

/// Snapshot of the orthographic camera the plotter renders through.
///
/// `view_size` is the camera's half-height in world units; the half-width is
/// `view_size * aspect`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    /// Camera position in world space.
    pub position: DVec2,
    /// Half-height of the visible region in world units. Must be positive.
    pub view_size: f64,
    /// Screen width over height. Must be positive.
    pub aspect: f64,
}

impl CameraView {
    /// Create a camera view.
    pub fn new(position: DVec2, view_size: f64, aspect: f64) -> Self {
        debug_assert!(view_size > 0.0, "view size must be positive");
        debug_assert!(aspect > 0.0, "aspect ratio must be positive");
        Self {
            position,
            view_size,
            aspect,
        }
    }

    /// Half-extents of the visible region.
    pub fn half_extents(&self) -> DVec2 {
        DVec2::new(self.view_size * self.aspect, self.view_size)
    }

    /// The frustum in camera-relative space (centred on the origin).
    pub fn frustum(&self) -> Frustum2 {
        let half = self.half_extents();
        Frustum2 {
            left: -half.x,
            right: half.x,
            top: half.y,
            bottom: -half.y,
        }
    }

    /// Transform a world-space point into camera-relative space.
    pub fn to_camera_space(&self, world: DVec2) -> DVec2 {
        world - self.position
    }

    /// Transform a camera-relative point back into world space.
    pub fn to_world_space(&self, local: DVec2) -> DVec2 {
        local + self.position
    }

    /// True when position and view size are exactly equal (bitwise float
    /// comparison semantics, no tolerance) and aspect is unchanged.
    pub fn same_view(&self, other: &CameraView) -> bool {
        self.position == other.position
            && self.view_size == other.view_size
            && self.aspect == other.aspect
    }

    /// True when every component differs by at most `epsilon`.
    pub fn approx_same_view(&self, other: &CameraView, epsilon: f64) -> bool {
        (self.position - other.position).abs().max_element() <= epsilon
            && (self.view_size - other.view_size).abs() <= epsilon
            && self.aspect == other.aspect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frustum_accounts_for_aspect() {
        let cam = CameraView::new(DVec2::new(10.0, 10.0), 3.0, 2.0);
        let f = cam.frustum();
        assert_eq!((f.left, f.right, f.bottom, f.top), (-6.0, 6.0, -3.0, 3.0));
    }

    #[test]
    fn test_space_roundtrip() {
        let cam = CameraView::new(DVec2::new(-4.0, 2.5), 1.0, 1.0);
        let p = DVec2::new(1.0, 1.0);
        assert_eq!(cam.to_world_space(cam.to_camera_space(p)), p);
        assert_eq!(cam.to_camera_space(cam.position), DVec2::ZERO);
    }

    #[test]
    fn test_same_view_is_exact() {
        let a = CameraView::new(DVec2::new(0.1, 0.2), 3.0, 1.0);
        let mut b = a;
        assert!(a.same_view(&b));
        b.position.x += 1e-15;
        assert!(!a.same_view(&b));
        assert!(a.approx_same_view(&b, 1e-9));
    }
}
