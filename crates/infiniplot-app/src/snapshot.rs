//! Compositing the active chunks into a viewport image and saving it as PNG.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use glam::DVec2;
use thiserror::Error;
use tracing::info;

use infiniplot_coords::{CameraView, ChunkCoord};
use infiniplot_raster::{Rgba, RgbaSurface, Stroke, stroke_polyline};
use infiniplot_stream::ActiveChunks;

const AXIS_COLOR: Rgba = [128, 128, 128, 255];

/// Errors from producing a viewport snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("viewport has zero area ({width}x{height})")]
    EmptyViewport { width: u32, height: u32 },
    #[error("failed to create snapshot file: {0}")]
    Io(#[source] io::Error),
    #[error("failed to encode PNG: {0}")]
    Encode(#[source] png::EncodingError),
}

/// Maps between world space and pixels of a `width × height` viewport seen
/// through `camera`. Pixel Y grows downward.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub camera: CameraView,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(camera: CameraView, width: u32, height: u32) -> Result<Self, SnapshotError> {
        if width == 0 || height == 0 {
            return Err(SnapshotError::EmptyViewport { width, height });
        }
        Ok(Self {
            camera,
            width,
            height,
        })
    }

    fn extent(&self) -> DVec2 {
        self.camera.half_extents() * 2.0
    }

    fn pixels(&self) -> DVec2 {
        DVec2::new(f64::from(self.width), f64::from(self.height))
    }

    /// World position at a (fractional) pixel coordinate.
    pub fn pixel_to_world(&self, pixel: DVec2) -> DVec2 {
        let uv = pixel / self.pixels() - DVec2::splat(0.5);
        let local = DVec2::new(uv.x, -uv.y) * self.extent();
        self.camera.to_world_space(local)
    }

    /// Pixel coordinate of a world position.
    pub fn world_to_pixel(&self, world: DVec2) -> DVec2 {
        let local = self.camera.to_camera_space(world) / self.extent();
        (DVec2::new(local.x, -local.y) + DVec2::splat(0.5)) * self.pixels()
    }
}

/// Render the axes and every active chunk visible in `viewport`.
///
/// Each output pixel takes the most opaque texel under its footprint in the
/// chunk beneath its center, so thin strokes survive when a chunk is shown
/// smaller than its resolution.
pub fn compose(viewport: &Viewport, active: &ActiveChunks, background: Rgba) -> RgbaSurface {
    let mut image = RgbaSurface::new(viewport.width, viewport.height);
    image.clear(background);
    draw_axes(&mut image, viewport);

    let Some(chunk_size) = active.chunk_size() else {
        return image;
    };
    let half_pixel = viewport.extent() / viewport.pixels() * 0.5;
    for py in 0..viewport.height {
        for px in 0..viewport.width {
            let pixel_center = DVec2::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
            let world = viewport.pixel_to_world(pixel_center);
            let coord = ChunkCoord::containing(world, chunk_size);
            let Some(drawable) = active.get(coord) else {
                continue;
            };
            let surface = drawable.surface();
            // Footprint in chunk-local texel space, Y down from the top edge.
            let top_left = drawable.center() + DVec2::new(-0.5, 0.5) * drawable.size();
            let to_texel =
                |p: DVec2| DVec2::new(p.x - top_left.x, top_left.y - p.y) / drawable.size();
            let a = to_texel(world - half_pixel);
            let b = to_texel(world + half_pixel);
            let x_range =
                texel_index(a.x.min(b.x), surface.width)..=texel_index(a.x.max(b.x), surface.width);
            let y_range =
                texel_index(a.y.min(b.y), surface.height)..=texel_index(a.y.max(b.y), surface.height);

            let mut best = [0u8; 4];
            for ty in y_range {
                for tx in x_range.clone() {
                    let texel = surface.get_pixel(tx, ty);
                    if texel[3] > best[3] {
                        best = texel;
                    }
                }
            }
            image.blend_pixel(px, py, best, 1.0);
        }
    }
    image
}

fn texel_index(t: f64, resolution: u32) -> u32 {
    let max = resolution.saturating_sub(1);
    ((t * f64::from(resolution)).floor().max(0.0) as u32).min(max)
}

fn draw_axes(image: &mut RgbaSurface, viewport: &Viewport) {
    // Snap to pixel centers so the axes are one crisp pixel wide.
    let origin = viewport.world_to_pixel(DVec2::ZERO).floor() + DVec2::splat(0.5);
    let w = f64::from(viewport.width);
    let h = f64::from(viewport.height);
    let stroke = Stroke {
        width: 1.0,
        color: AXIS_COLOR,
    };
    stroke_polyline(image, &[DVec2::new(0.0, origin.y), DVec2::new(w, origin.y)], stroke);
    stroke_polyline(image, &[DVec2::new(origin.x, 0.0), DVec2::new(origin.x, h)], stroke);
}

/// Draw a world-space line segment over a composed image.
pub fn overlay_segment(
    image: &mut RgbaSurface,
    viewport: &Viewport,
    from: DVec2,
    to: DVec2,
    stroke: Stroke,
) {
    let points = [viewport.world_to_pixel(from), viewport.world_to_pixel(to)];
    stroke_polyline(image, &points, stroke);
}

/// Encode `image` as an 8-bit RGBA PNG at `path`.
pub fn write_png(path: &Path, image: &RgbaSurface) -> Result<(), SnapshotError> {
    let file = File::create(path).map_err(SnapshotError::Io)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(SnapshotError::Encode)?;
    writer
        .write_image_data(&image.pixels)
        .map_err(SnapshotError::Encode)?;
    writer.finish().map_err(SnapshotError::Encode)?;
    info!(path = %path.display(), width = image.width, height = image.height, "snapshot written");
    Ok(())
}
