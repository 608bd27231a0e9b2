//! Level-of-detail selection: snapping the camera's view size onto the
//! 1-2-5 decade ladder to size chunks and space grid lines.

mod selector;

pub use selector::{DEFAULT_OFFSET_FACTOR, LodSelector, grid_spacing, snap_to_ladder};
