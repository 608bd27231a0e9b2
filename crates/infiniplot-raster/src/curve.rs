//! Sampling `y = f(x)` across a chunk and drawing it into the chunk surface.

use glam::DVec2;
use tracing::trace;

use crate::{Rgba, RgbaSurface, Stroke, stroke_polyline};

/// Counters from rendering one chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CurveStats {
    /// Number of `f(x)` evaluations.
    pub sampled: u32,
    /// Samples that became polyline vertices.
    pub plotted: u32,
    /// Samples where `f(x)` was NaN or infinite.
    pub undefined: u32,
    /// Samples above or below the chunk.
    pub out_of_range: u32,
}

/// Renders a function curve into chunk surfaces.
///
/// The sample count and colours are fixed per renderer; the chunk extent and
/// the stroke width vary per call.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveRenderer {
    samples: u32,
    stroke_color: Rgba,
    background: Rgba,
}

impl CurveRenderer {
    /// Create a renderer taking `samples` evaluations per chunk.
    ///
    /// # Panics
    ///
    /// Panics if `samples < 2`.
    pub fn new(samples: u32, stroke_color: Rgba, background: Rgba) -> Self {
        assert!(samples >= 2, "a curve needs at least two samples per chunk");
        Self {
            samples,
            stroke_color,
            background,
        }
    }

    /// Samples taken per chunk.
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// The colour surfaces are cleared to.
    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Map a world point to surface pixel coordinates for the chunk centred
    /// at `center` with edge length `size`. Y is flipped so world-up is
    /// surface-up.
    pub fn world_to_pixel(surface: &RgbaSurface, center: DVec2, size: f64, world: DVec2) -> DVec2 {
        let res = DVec2::new(f64::from(surface.width), f64::from(surface.height));
        let offset = (world - center) / size;
        DVec2::new(offset.x * res.x + res.x * 0.5, res.y * 0.5 - offset.y * res.y)
    }

    /// Clear `surface` and draw `f` across the chunk centred at `center`.
    ///
    /// `stroke_width` is in world units; it is converted to pixels for this
    /// chunk size so the line keeps the same on-screen thickness at every
    /// zoom level. Undefined samples and samples outside the chunk's vertical
    /// range are dropped one by one; the polyline connects the survivors.
    pub fn render<F>(
        &self,
        surface: &mut RgbaSurface,
        center: DVec2,
        size: f64,
        f: &F,
        stroke_width: f64,
    ) -> CurveStats
    where
        F: Fn(f64) -> f64 + ?Sized,
    {
        surface.clear(self.background);

        let half = size * 0.5;
        let left = center.x - half;
        let step = size / f64::from(self.samples - 1);

        let mut stats = CurveStats::default();
        let mut points = Vec::with_capacity(self.samples as usize);
        for i in 0..self.samples {
            let x = left + step * f64::from(i);
            let y = f(x);
            stats.sampled += 1;
            if !y.is_finite() {
                stats.undefined += 1;
                continue;
            }
            if (y - center.y).abs() > half {
                stats.out_of_range += 1;
                continue;
            }
            points.push(Self::world_to_pixel(surface, center, size, DVec2::new(x, y)));
        }
        stats.plotted = points.len() as u32;

        let width_px = stroke_width / size * f64::from(surface.width);
        stroke_polyline(
            surface,
            &points,
            Stroke {
                width: width_px,
                color: self.stroke_color,
            },
        );

        trace!(
            center_x = center.x,
            center_y = center.y,
            size,
            plotted = stats.plotted,
            undefined = stats.undefined,
            "rendered chunk curve"
        );
        stats
    }
}
