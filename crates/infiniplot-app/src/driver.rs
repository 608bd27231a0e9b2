//! Headless driver: a scripted camera path feeding the chunk streamer.

use std::time::Duration;

use glam::DVec2;
use tracing::debug;

use infiniplot_config::Config;
use infiniplot_stream::{ChunkStreamer, Equation, StreamStatus, StreamerConfig};

use crate::camera::CameraController;
use crate::scale::RelativeScale;

/// Translate the persisted config into streamer tuning.
pub fn streamer_config(config: &Config) -> StreamerConfig {
    let streaming = &config.streaming;
    StreamerConfig {
        resolution: streaming.chunk_resolution,
        samples: streaming.samples_per_chunk,
        lod_offset_factor: streaming.lod_offset_factor,
        chunk_scale_factor: streaming.chunk_scale_factor,
        frame_budget: Duration::from_millis(streaming.frame_budget_ms),
        max_steps_per_slice: streaming.max_steps_per_slice,
        camera_epsilon: streaming.camera_epsilon,
        view_scale: config.view.default_view_size * config.view.relative_scale,
        stroke_color: config.render.stroke_color,
        background: config.render.background_color,
    }
}

/// One simulated input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptStep {
    Hold,
    /// Drag between two screen-fraction positions.
    Drag { from: DVec2, to: DVec2 },
    /// Mouse wheel delta; positive zooms out.
    Wheel(f64),
    Reset,
}

/// The demo's camera path at update `index` of `total`: pan right, zoom
/// out, pan diagonally, zoom back in, then settle.
pub fn demo_script(index: u64, total: u64) -> ScriptStep {
    let total = total.max(1);
    let t = index as f64 / total as f64;
    let center = DVec2::splat(0.5);
    if t < 0.25 {
        ScriptStep::Drag {
            from: center,
            to: center - DVec2::new(0.004, 0.0),
        }
    } else if t < 0.5 {
        ScriptStep::Wheel(20.0)
    } else if t < 0.75 {
        ScriptStep::Drag {
            from: center,
            to: center + DVec2::new(-0.003, 0.003),
        }
    } else if t < 0.95 {
        ScriptStep::Wheel(-25.0)
    } else {
        ScriptStep::Hold
    }
}

/// Summary of one presented frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub status: StreamStatus,
    pub active_chunks: usize,
    pub chunk_size: Option<f64>,
    pub generation: u64,
}

/// Couples the camera controller, the zoom-relative stroke scale and the
/// streamer the way an interactive host would.
pub struct DemoDriver {
    camera: CameraController,
    scale: RelativeScale,
    streamer: ChunkStreamer,
}

impl DemoDriver {
    pub fn new(config: &Config, equation: Equation) -> Self {
        Self {
            camera: CameraController::from_config(&config.view),
            scale: RelativeScale::new(config.view.relative_scale),
            streamer: ChunkStreamer::new(streamer_config(config), equation),
        }
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn streamer(&self) -> &ChunkStreamer {
        &self.streamer
    }

    pub fn streamer_mut(&mut self) -> &mut ChunkStreamer {
        &mut self.streamer
    }

    /// Feed one input event to the camera.
    pub fn apply(&mut self, step: ScriptStep) {
        match step {
            ScriptStep::Hold => {}
            ScriptStep::Drag { from, to } => {
                self.camera.pointer_down(from);
                self.camera.pointer_move(to);
                self.camera.pointer_up();
            }
            ScriptStep::Wheel(delta) => self.camera.wheel(delta),
            ScriptStep::Reset => self.camera.reset(),
        }
    }

    /// Forward camera changes to the streamer and run one streaming slice.
    pub fn frame(&mut self, frame: u64) -> FrameReport {
        // Camera first: the stroke change then joins the task just started.
        self.streamer.update(self.camera.view());
        if let Some(view_size) = self.camera.take_zoom() {
            self.streamer.set_view_scale(self.scale.view_scale(view_size));
        }
        let status = self.streamer.tick();
        let report = FrameReport {
            frame,
            status,
            active_chunks: self.streamer.active_chunks().len(),
            chunk_size: self.streamer.chunk_size(),
            generation: self.streamer.generation(),
        };
        debug!(
            frame,
            ?status,
            active = report.active_chunks,
            chunk_size = ?report.chunk_size,
            generation = report.generation,
            "frame streamed"
        );
        report
    }

    /// Let any in-flight streaming finish. Returns the slices it took.
    pub fn settle(&mut self) -> u32 {
        self.streamer.update(self.camera.view());
        self.streamer.flush()
    }
}

#[cfg(test)]
mod tests {
    use infiniplot_stream::discover_visible;

    use super::*;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.streaming.chunk_resolution = 16;
        config.streaming.samples_per_chunk = 8;
        config.streaming.frame_budget_ms = 10_000;
        config
    }

    #[test]
    fn test_streamer_config_mapping() {
        let config = Config::default();
        let sc = streamer_config(&config);
        assert_eq!(sc.resolution, 512);
        assert_eq!(sc.samples, 256);
        assert_eq!(sc.frame_budget, Duration::from_millis(100));
        assert_eq!(sc.max_steps_per_slice, 0);
        assert_eq!(sc.lod_offset_factor, 0.4);
        assert!((sc.view_scale - 0.03).abs() < 1e-15);
    }

    #[test]
    fn test_script_phases() {
        assert!(matches!(demo_script(0, 100), ScriptStep::Drag { .. }));
        assert_eq!(demo_script(30, 100), ScriptStep::Wheel(20.0));
        assert!(matches!(demo_script(60, 100), ScriptStep::Drag { .. }));
        assert_eq!(demo_script(80, 100), ScriptStep::Wheel(-25.0));
        assert_eq!(demo_script(99, 100), ScriptStep::Hold);
        // A zero-length run still yields a valid step.
        assert!(matches!(demo_script(0, 0), ScriptStep::Drag { .. }));
    }

    #[test]
    fn test_first_frame_streams_the_view() {
        let mut driver = DemoDriver::new(&small_config(), Equation::new("x", |x| x));
        let report = driver.frame(0);
        assert_eq!(report.status, StreamStatus::Completed);
        let expected = discover_visible(&driver.camera().view(), report.chunk_size.unwrap());
        assert_eq!(driver.streamer().active_chunks().sorted_coords(), expected);
    }

    #[test]
    fn test_zoom_updates_view_scale() {
        let mut driver = DemoDriver::new(&small_config(), Equation::new("x", |x| x));
        driver.frame(0);
        driver.apply(ScriptStep::Wheel(100.0));
        driver.frame(1);
        let expected = driver.camera().view_size() * 0.01;
        assert!((driver.streamer().view_scale() - expected).abs() < 1e-12);
        assert_eq!(driver.streamer().revision(), 1);
    }

    #[test]
    fn test_zoom_frame_starts_one_task() {
        let mut driver = DemoDriver::new(&small_config(), Equation::new("x", |x| x));
        driver.frame(0);
        let generation = driver.streamer().generation();
        driver.apply(ScriptStep::Wheel(20.0));
        let report = driver.frame(1);
        assert_eq!(report.generation, generation + 1);
        assert_eq!(report.status, StreamStatus::Completed);
        for (_, d) in driver.streamer().active_chunks().iter() {
            assert_eq!(d.revision(), driver.streamer().revision());
        }
    }

    #[test]
    fn test_scripted_run_ends_consistent() {
        let mut driver = DemoDriver::new(&small_config(), Equation::new("sin", f64::sin));
        let total = 40;
        for i in 0..total {
            driver.apply(demo_script(i, total));
            driver.frame(i);
        }
        driver.settle();
        let view = driver.camera().view();
        let size = driver.streamer().chunk_size().unwrap();
        assert_eq!(size, driver.streamer().chunk_size_for(view.view_size));
        assert_eq!(driver.streamer().active_chunks().sorted_coords(), discover_visible(&view, size));
        assert!(!driver.streamer().is_streaming());
    }

    #[test]
    fn test_reset_step() {
        let mut driver = DemoDriver::new(&small_config(), Equation::new("x", |x| x));
        driver.apply(ScriptStep::Wheel(40.0));
        driver.apply(ScriptStep::Reset);
        assert_eq!(driver.camera().view_size(), 3.0);
        assert_eq!(driver.camera().position(), DVec2::ZERO);
    }
}
