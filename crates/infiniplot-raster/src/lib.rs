//! CPU rasterization of function curves into fixed-resolution RGBA surfaces.
//!
//! A chunk's surface has the same texel count whatever its world size, so the
//! curve renderer maps world samples into surface pixels relative to the
//! chunk and converts the world-space stroke width into pixels per chunk.

mod curve;
mod stroke;
mod surface;

pub use curve::{CurveRenderer, CurveStats};
pub use stroke::{Stroke, stroke_polyline};
pub use surface::{Rgba, RgbaSurface};
