//! View-size based LOD selection on the 1-2-5 decade ladder.

/// Offset applied to the view size before snapping, as used by the plotter.
pub const DEFAULT_OFFSET_FACTOR: f64 = 0.4;

/// Snap a positive value down onto the 1-2-5 ladder.
///
/// Returns the largest number of the form `{1, 2, 5} × 10^k` (integer `k`)
/// that does not exceed `value`: the classic graph-axis tick spacing rule.
/// Non-positive or non-finite input is a caller bug; release builds return
/// `f64::MIN_POSITIVE` for it.
pub fn snap_to_ladder(value: f64) -> f64 {
    debug_assert!(
        value.is_finite() && value > 0.0,
        "ladder input must be positive and finite, got {value}"
    );
    if !(value.is_finite() && value > 0.0) {
        return f64::MIN_POSITIVE;
    }

    let mut exponent = value.log10().floor() as i32;
    // log10 can land one ulp on the wrong side of an exact power of ten.
    if rung(1.0, exponent) > value {
        exponent -= 1;
    } else if rung(1.0, exponent + 1) <= value {
        exponent += 1;
    }

    [5.0, 2.0, 1.0]
        .into_iter()
        .map(|mantissa| rung(mantissa, exponent))
        .find(|&step| step <= value)
        .unwrap_or_else(|| rung(1.0, exponent))
}

/// `mantissa × 10^exponent`, rounded once. Negative exponents divide by an
/// exact power of ten instead of multiplying by an inexact reciprocal.
fn rung(mantissa: f64, exponent: i32) -> f64 {
    if exponent >= 0 {
        mantissa * 10f64.powi(exponent)
    } else {
        mantissa / 10f64.powi(-exponent)
    }
}

/// Spacing between major grid lines for the given view size.
///
/// Uses the raw view size with no offset so the grid stays denser than the
/// chunk grid.
pub fn grid_spacing(view_size: f64) -> f64 {
    snap_to_ladder(view_size)
}

/// Selects the chunk LOD step for the camera's view size.
///
/// Stateless apart from its offset factor; two selectors with the same factor
/// always agree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodSelector {
    offset_factor: f64,
}

impl LodSelector {
    /// Create a selector with a custom offset factor.
    ///
    /// # Panics
    ///
    /// Panics if `offset_factor` is not positive and finite.
    pub fn new(offset_factor: f64) -> Self {
        assert!(
            offset_factor.is_finite() && offset_factor > 0.0,
            "offset factor must be positive"
        );
        Self { offset_factor }
    }

    /// The factor applied to the view size before snapping.
    pub fn offset_factor(&self) -> f64 {
        self.offset_factor
    }

    /// Snapped LOD step for a view size (camera half-height in world units).
    pub fn select(&self, view_size: f64) -> f64 {
        snap_to_ladder(view_size * self.offset_factor)
    }

    /// Chunk edge length for a view size: the LOD step times `scale_factor`.
    pub fn chunk_size(&self, view_size: f64, scale_factor: f64) -> f64 {
        self.select(view_size) * scale_factor
    }
}

impl Default for LodSelector {
    fn default() -> Self {
        Self::new(DEFAULT_OFFSET_FACTOR)
    }
}
