//! Free 2D camera: wheel zoom, drag pan and reset.

use glam::DVec2;
use tracing::debug;

use infiniplot_config::ViewConfig;
use infiniplot_coords::CameraView;

/// Wheel zoom base: each unit of scaled wheel delta multiplies the view size
/// by this factor.
const WHEEL_ZOOM_BASE: f64 = 1.01;
/// Scale applied to raw wheel deltas.
const WHEEL_DELTA_SCALE: f64 = 0.1;

/// Orthographic camera controller.
///
/// Positions are in world units. Pointer positions are given as fractions of
/// the screen (`0..1` on each axis, Y down), so drag distance translates to
/// world distance independently of the window size.
#[derive(Debug, Clone)]
pub struct CameraController {
    position: DVec2,
    view_size: f64,
    default_position: DVec2,
    default_view_size: f64,
    min_view_size: f64,
    max_view_size: f64,
    aspect: f64,
    drag_anchor: Option<DVec2>,
    pending_zoom: Option<f64>,
}

impl CameraController {
    pub fn new(default_view_size: f64, min_view_size: f64, max_view_size: f64, aspect: f64) -> Self {
        assert!(
            min_view_size > 0.0 && min_view_size <= max_view_size,
            "view size bounds must satisfy 0 < min <= max"
        );
        assert!(aspect > 0.0, "aspect ratio must be positive");
        let default_view_size = default_view_size.clamp(min_view_size, max_view_size);
        Self {
            position: DVec2::ZERO,
            view_size: default_view_size,
            default_position: DVec2::ZERO,
            default_view_size,
            min_view_size,
            max_view_size,
            aspect,
            drag_anchor: None,
            pending_zoom: None,
        }
    }

    pub fn from_config(view: &ViewConfig) -> Self {
        Self::new(
            view.default_view_size,
            view.min_view_size,
            view.max_view_size,
            view.aspect_ratio(),
        )
    }

    /// Snapshot of the current view for the streamer.
    pub fn view(&self) -> CameraView {
        CameraView::new(self.position, self.view_size, self.aspect)
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn view_size(&self) -> f64 {
        self.view_size
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    /// Change the aspect ratio after a viewport resize.
    pub fn set_aspect(&mut self, aspect: f64) {
        assert!(aspect > 0.0, "aspect ratio must be positive");
        self.aspect = aspect;
    }

    /// Zoom by a wheel delta. Positive deltas zoom out.
    pub fn wheel(&mut self, delta_y: f64) {
        let factor = WHEEL_ZOOM_BASE.powf(delta_y * WHEEL_DELTA_SCALE);
        self.set_view_size(self.view_size * factor);
    }

    /// Set the view size directly, clamped to the configured bounds.
    pub fn set_view_size(&mut self, view_size: f64) {
        self.view_size = view_size.clamp(self.min_view_size, self.max_view_size);
        self.pending_zoom = Some(self.view_size);
        debug!(view_size = self.view_size, "camera zoomed");
    }

    /// The view size after the most recent zoom, once per zoom burst.
    ///
    /// Hosts poll this each frame and forward it to zoom-dependent state.
    pub fn take_zoom(&mut self) -> Option<f64> {
        self.pending_zoom.take()
    }

    /// Begin a drag at a screen-fraction position.
    pub fn pointer_down(&mut self, screen: DVec2) {
        self.drag_anchor = Some(screen);
    }

    /// Continue a drag. The world follows the pointer.
    pub fn pointer_move(&mut self, screen: DVec2) {
        let Some(anchor) = self.drag_anchor else {
            return;
        };
        let delta = screen - anchor;
        self.position.x -= delta.x * self.view_size * 2.0 * self.aspect;
        self.position.y += delta.y * self.view_size * 2.0;
        self.drag_anchor = Some(screen);
    }

    /// End a drag (button released or pointer left the window).
    pub fn pointer_up(&mut self) {
        self.drag_anchor = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Move the camera by a world-space offset.
    pub fn pan_by(&mut self, offset: DVec2) {
        self.position += offset;
    }

    /// Return to the starting position and view size.
    pub fn reset(&mut self) {
        self.position = self.default_position;
        self.set_view_size(self.default_view_size);
    }

    pub fn min_view_size(&self) -> f64 {
        self.min_view_size
    }

    pub fn max_view_size(&self) -> f64 {
        self.max_view_size
    }

    /// Lower the zoom-in limit, re-clamping the current view size.
    pub fn set_min_view_size(&mut self, min: f64) {
        assert!(min > 0.0 && min <= self.max_view_size, "invalid minimum view size");
        self.min_view_size = min;
        if self.view_size < min {
            self.set_view_size(min);
        }
    }

    /// Set the zoom-out limit, re-clamping the current view size.
    pub fn set_max_view_size(&mut self, max: f64) {
        assert!(max >= self.min_view_size, "invalid maximum view size");
        self.max_view_size = max;
        if self.view_size > max {
            self.set_view_size(max);
        }
    }
}
