/// Keeps world-space stroke widths proportional to the view size, so lines
/// look equally thick at every zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeScale {
    relative_scale: f64,
}

impl RelativeScale {
    pub fn new(relative_scale: f64) -> Self {
        assert!(
            relative_scale.is_finite() && relative_scale > 0.0,
            "relative scale must be positive"
        );
        Self { relative_scale }
    }

    pub fn relative_scale(&self) -> f64 {
        self.relative_scale
    }

    pub fn set_relative_scale(&mut self, relative_scale: f64) {
        *self = Self::new(relative_scale);
    }

    /// World-space stroke width at `view_size`.
    pub fn view_scale(&self, view_size: f64) -> f64 {
        view_size * self.relative_scale
    }
}
