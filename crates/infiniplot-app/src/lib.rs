//! infiniplot application layer.
//!
//! Everything around the chunk streamer that a host needs: the frame loop,
//! the camera controller and its zoom-dependent stroke scale, equation
//! presets, the Newton root solver, viewport snapshots and the scripted
//! headless driver used by the `infiniplot` binary.

pub mod camera;
pub mod driver;
pub mod equations;
pub mod frame_loop;
pub mod platform;
pub mod root_solver;
pub mod scale;
pub mod snapshot;
