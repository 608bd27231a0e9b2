//! Fixed-timestep frame loop.
//!
//! Camera input is simulated at a fixed 60 Hz through an accumulator, while
//! streaming work runs once per presented frame. Frame time can be measured
//! from the wall clock or supplied explicitly, which keeps headless runs
//! reproducible.

use std::time::Instant;

use tracing::warn;

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Frame times above this are clamped so a stall does not turn into a burst
/// of catch-up steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Accumulator-driven frame loop.
pub struct FrameLoop {
    previous_time: Instant,
    accumulator: f64,
    total_sim_time: f64,
    frame_count: u64,
    update_count: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            accumulator: 0.0,
            total_sim_time: 0.0,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Run one frame timed by the wall clock.
    ///
    /// `update_fn(dt, sim_time)` runs zero or more times at [`FIXED_DT`];
    /// `frame_fn(frame_index)` runs exactly once afterwards.
    pub fn tick(&mut self, update_fn: impl FnMut(f64, f64), frame_fn: impl FnMut(u64)) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.advance(frame_time, update_fn, frame_fn);
    }

    /// Run one frame with an explicit frame time in seconds.
    pub fn tick_with(
        &mut self,
        frame_time: f64,
        update_fn: impl FnMut(f64, f64),
        frame_fn: impl FnMut(u64),
    ) {
        self.advance(frame_time, update_fn, frame_fn);
    }

    fn advance(
        &mut self,
        mut frame_time: f64,
        mut update_fn: impl FnMut(f64, f64),
        mut frame_fn: impl FnMut(u64),
    ) {
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }
        self.accumulator += frame_time.max(0.0);

        while self.accumulator >= FIXED_DT {
            update_fn(FIXED_DT, self.total_sim_time);
            self.total_sim_time += FIXED_DT;
            self.accumulator -= FIXED_DT;
            self.update_count += 1;
        }

        frame_fn(self.frame_count);
        self.frame_count += 1;
    }

    /// Fraction of a fixed step left in the accumulator, in `[0, 1)`.
    pub fn alpha(&self) -> f64 {
        if self.accumulator > 0.0 {
            self.accumulator / FIXED_DT
        } else {
            0.0
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Simulated seconds so far.
    pub fn total_sim_time(&self) -> f64 {
        self.total_sim_time
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_step() {
        let mut frames = FrameLoop::new();
        let mut updates = 0u32;
        frames.tick_with(FIXED_DT, |_, _| updates += 1, |_| {});
        assert_eq!(updates, 1);
        assert!(frames.accumulator.abs() < 1e-12);
    }

    #[test]
    fn test_partial_step_still_runs_frame() {
        let mut frames = FrameLoop::new();
        let mut updates = 0u32;
        let mut frame_index = None;
        frames.tick_with(0.5 * FIXED_DT, |_, _| updates += 1, |i| frame_index = Some(i));
        assert_eq!(updates, 0);
        assert_eq!(frame_index, Some(0));
        assert!((frames.alpha() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_multiple_steps_advance_sim_time() {
        let mut frames = FrameLoop::new();
        let mut times = Vec::new();
        frames.tick_with(3.0 * FIXED_DT + 1e-9, |_, t| times.push(t), |_| {});
        assert_eq!(times.len(), 3);
        assert!((times[2] - 2.0 * FIXED_DT).abs() < 1e-12);
        assert!((frames.total_sim_time() - 3.0 * FIXED_DT).abs() < 1e-12);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut frames = FrameLoop::new();
        let mut updates = 0u32;
        frames.tick_with(5.0, |_, _| updates += 1, |_| {});
        let max_updates = (MAX_FRAME_TIME / FIXED_DT).ceil() as u32;
        assert!(updates <= max_updates, "{updates} > {max_updates}");
        assert!(updates > 0);
    }

    #[test]
    fn test_negative_frame_time_ignored() {
        let mut frames = FrameLoop::new();
        let mut updates = 0u32;
        frames.tick_with(-1.0, |_, _| updates += 1, |_| {});
        assert_eq!(updates, 0);
        assert_eq!(frames.frame_count(), 1);
    }

    #[test]
    fn test_frame_indices_increment() {
        let mut frames = FrameLoop::default();
        let mut seen = Vec::new();
        for _ in 0..5 {
            frames.tick_with(FIXED_DT, |_, _| {}, |i| seen.push(i));
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(frames.update_count(), 5);
    }
}
