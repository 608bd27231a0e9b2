use std::fmt;

use glam::DVec2;
use infiniplot_coords::Aabb2;
use infiniplot_raster::RgbaSurface;

/// Unique identity of a pooled surface, stable across reuse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// A drawable chunk surface: a fixed-resolution RGBA image plus the
/// world-space placement the host composites it at.
///
/// Not `Clone`: a drawable lives in exactly one place, either the active set
/// or the pool's free list, and moves between them by value.
#[derive(Debug)]
pub struct ChunkDrawable {
    id: SurfaceId,
    surface: RgbaSurface,
    center: DVec2,
    size: f64,
    visible: bool,
    revision: u64,
}

impl ChunkDrawable {
    #[cfg(test)]
    pub(crate) fn new(id: SurfaceId, resolution: u32) -> Self {
        Self::from_surface(id, RgbaSurface::new(resolution, resolution))
    }

    pub(crate) fn from_surface(id: SurfaceId, surface: RgbaSurface) -> Self {
        Self {
            id,
            surface,
            center: DVec2::ZERO,
            size: 0.0,
            visible: false,
            revision: 0,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// The rendered pixels.
    pub fn surface(&self) -> &RgbaSurface {
        &self.surface
    }

    pub(crate) fn surface_mut(&mut self) -> &mut RgbaSurface {
        &mut self.surface
    }

    /// World-space center the surface is drawn at.
    pub fn center(&self) -> DVec2 {
        self.center
    }

    /// World-space edge length of the (square) surface.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// World-space rectangle covered by the surface.
    pub fn world_bounds(&self) -> Aabb2 {
        Aabb2::from_center_half_extents(self.center, DVec2::splat(self.size * 0.5))
    }

    /// Place the surface in the world.
    pub fn set_transform(&mut self, center: DVec2, size: f64) {
        self.center = center;
        self.size = size;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Content revision the surface was last rendered at.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn set_revision(&mut self, revision: u64) {
        self.revision = revision;
    }
}
