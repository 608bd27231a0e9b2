use glam::DVec2;

/// Axis-aligned bounding box in 2D world space.
///
/// Invariant: `min.x <= max.x` and `min.y <= max.y`.
/// The constructor enforces this by swapping components if needed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb2 {
    /// Create an AABB from two corners. Automatically sorts
    /// components so that min <= max on every axis.
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB from a center point and half-extents.
    pub fn from_center_half_extents(center: DVec2, half: DVec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Returns true if the point lies inside or on the boundary.
    pub fn contains_point(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Returns true if the open interiors of the two boxes overlap.
    ///
    /// Boxes that only share an edge or a corner do not overlap. Containment
    /// in either direction counts as overlap.
    pub fn overlaps(&self, other: &Aabb2) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }

    /// Strict interval overlap on the X axis.
    pub fn overlaps_x(&self, other: &Aabb2) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x
    }

    /// Strict interval overlap on the Y axis.
    pub fn overlaps_y(&self, other: &Aabb2) -> bool {
        self.min.y < other.max.y && self.max.y > other.min.y
    }

    /// Returns the box moved by `offset`.
    pub fn translated(&self, offset: DVec2) -> Aabb2 {
        Aabb2 {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Returns the center point of the AABB.
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Returns the size along each axis.
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_at(x: f64, y: f64) -> Aabb2 {
        Aabb2::from_center_half_extents(DVec2::new(x, y), DVec2::splat(0.5))
    }

    #[test]
    fn test_new_sorts_corners() {
        let b = Aabb2::new(DVec2::new(3.0, -1.0), DVec2::new(-2.0, 4.0));
        assert_eq!(b.min, DVec2::new(-2.0, -1.0));
        assert_eq!(b.max, DVec2::new(3.0, 4.0));
    }

    #[test]
    fn test_overlap_partial() {
        assert!(unit_at(0.0, 0.0).overlaps(&unit_at(0.5, 0.5)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        assert!(!unit_at(0.0, 0.0).overlaps(&unit_at(1.0, 0.0)));
        assert!(!unit_at(0.0, 0.0).overlaps(&unit_at(1.0, 1.0)));
    }

    #[test]
    fn test_containment_overlaps_both_ways() {
        let big = Aabb2::from_center_half_extents(DVec2::ZERO, DVec2::splat(10.0));
        let small = unit_at(2.0, -3.0);
        assert!(big.overlaps(&small));
        assert!(small.overlaps(&big));
    }

    #[test]
    fn test_separated_on_one_axis() {
        let a = unit_at(0.0, 0.0);
        let b = unit_at(0.2, 5.0);
        assert!(a.overlaps_x(&b));
        assert!(!a.overlaps_y(&b));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_center_size_translate() {
        let b = Aabb2::new(DVec2::new(1.0, 2.0), DVec2::new(3.0, 6.0));
        assert_eq!(b.center(), DVec2::new(2.0, 4.0));
        assert_eq!(b.size(), DVec2::new(2.0, 4.0));
        assert_eq!(b.translated(DVec2::new(-1.0, 1.0)).min, DVec2::new(0.0, 3.0));
        assert!(b.contains_point(DVec2::new(3.0, 6.0)));
        assert!(!b.contains_point(DVec2::new(3.1, 6.0)));
    }
}
