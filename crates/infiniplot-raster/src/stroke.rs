//! Anti-aliased thick polyline stroking.

use glam::DVec2;

use crate::{Rgba, RgbaSurface};

/// Stroke parameters in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Line width in pixels.
    pub width: f64,
    /// Line colour.
    pub color: Rgba,
}

/// Stroke a connected polyline through `points` (pixel coordinates, Y down).
///
/// Each pixel's coverage comes from its center's distance to the nearest
/// segment, with a one-pixel linear falloff at the edge. A single point
/// draws a round dot. Parts outside the surface are clipped.
pub fn stroke_polyline(surface: &mut RgbaSurface, points: &[DVec2], stroke: Stroke) {
    match points {
        [] => {}
        [p] => stroke_segment(surface, *p, *p, stroke),
        _ => {
            for pair in points.windows(2) {
                stroke_segment(surface, pair[0], pair[1], stroke);
            }
        }
    }
}

fn stroke_segment(surface: &mut RgbaSurface, a: DVec2, b: DVec2, stroke: Stroke) {
    if surface.width == 0 || surface.height == 0 {
        return;
    }
    let half = (stroke.width * 0.5).max(0.5);
    let reach = half + 1.0;

    let lo = a.min(b) - DVec2::splat(reach);
    let hi = a.max(b) + DVec2::splat(reach);
    let max_x = f64::from(surface.width - 1);
    let max_y = f64::from(surface.height - 1);
    if hi.x < 0.0 || hi.y < 0.0 || lo.x > max_x || lo.y > max_y {
        return;
    }

    let x0 = lo.x.floor().clamp(0.0, max_x) as u32;
    let x1 = hi.x.ceil().clamp(0.0, max_x) as u32;
    let y0 = lo.y.floor().clamp(0.0, max_y) as u32;
    let y1 = hi.y.ceil().clamp(0.0, max_y) as u32;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let center = DVec2::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let d = distance_to_segment(center, a, b);
            let coverage = (half + 0.5 - d).clamp(0.0, 1.0);
            if coverage > 0.0 {
                surface.blend_pixel(x, y, stroke.color, coverage as f32);
            }
        }
    }
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];

    #[test]
    fn test_distance_to_segment() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(10.0, 0.0);
        assert!((distance_to_segment(DVec2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        assert!((distance_to_segment(DVec2::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-12);
        assert!((distance_to_segment(DVec2::new(1.0, 1.0), a, a) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_horizontal_line_covers_row() {
        let mut surface = RgbaSurface::new(16, 16);
        let points = [DVec2::new(0.0, 8.5), DVec2::new(16.0, 8.5)];
        stroke_polyline(&mut surface, &points, Stroke { width: 1.0, color: RED });
        for x in 0..16 {
            assert_eq!(surface.get_pixel(x, 8), RED, "pixel ({x}, 8)");
        }
        assert_eq!(surface.get_pixel(8, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_wider_stroke_paints_more() {
        let points = [DVec2::new(2.0, 2.0), DVec2::new(30.0, 20.0)];
        let mut thin = RgbaSurface::new(32, 32);
        let mut thick = RgbaSurface::new(32, 32);
        stroke_polyline(&mut thin, &points, Stroke { width: 1.0, color: RED });
        stroke_polyline(&mut thick, &points, Stroke { width: 6.0, color: RED });
        assert!(thick.painted_pixel_count([0; 4]) > 2 * thin.painted_pixel_count([0; 4]));
    }

    #[test]
    fn test_single_point_draws_dot() {
        let mut surface = RgbaSurface::new(8, 8);
        stroke_polyline(&mut surface, &[DVec2::new(4.0, 4.0)], Stroke { width: 2.0, color: RED });
        assert!(surface.painted_pixel_count([0; 4]) > 0);
        assert_eq!(surface.get_pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_offscreen_segment_is_clipped() {
        let mut surface = RgbaSurface::new(8, 8);
        let points = [DVec2::new(-50.0, -50.0), DVec2::new(-20.0, -40.0)];
        stroke_polyline(&mut surface, &points, Stroke { width: 3.0, color: RED });
        assert_eq!(surface.painted_pixel_count([0; 4]), 0);
    }

    #[test]
    fn test_empty_polyline() {
        let mut surface = RgbaSurface::new(4, 4);
        stroke_polyline(&mut surface, &[], Stroke { width: 3.0, color: RED });
        assert_eq!(surface.painted_pixel_count([0; 4]), 0);
    }
}
