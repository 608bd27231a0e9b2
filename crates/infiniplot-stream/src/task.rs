//! A streaming task: one cooperative pass of cull, discover and render for a
//! single camera state.
//!
//! The task is a plain state machine. [`StreamingTask::resume`] runs until
//! the slice budget runs out and returns [`TaskStatus::Yielded`]; the next
//! call picks up at the exact next step. The pool and active set are only
//! borrowed for the duration of a `resume` call, so dropping a task is all
//! it takes to cancel it.

use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use infiniplot_coords::{CameraView, ChunkCoord};
use infiniplot_raster::CurveRenderer;

use crate::{ActiveChunks, ChunkDrawable, Equation, FloodFill, SurfacePool, Visit, cull_stale};

/// Where a task is in its pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskPhase {
    /// LOD check and stale-chunk release.
    Culling,
    /// Budget checkpoint between culling and discovery.
    MaybeYield,
    /// Flood fill, rendering chunks as they are found.
    Discovering,
    /// Finished; further resumes do nothing.
    Done,
}

/// Result of one [`StreamingTask::resume`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskStatus {
    /// The slice budget ran out; call `resume` again next frame.
    Yielded,
    /// The pass is complete.
    Done,
}

/// Limits on the work done in one slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliceBudget {
    /// Wall-clock time allowed per slice.
    pub time: Duration,
    /// Discovery steps allowed per slice; `0` means unlimited.
    pub max_steps: u32,
}

impl SliceBudget {
    /// No time limit and no step limit: the task finishes in one slice.
    pub const UNLIMITED: Self = Self {
        time: Duration::MAX,
        max_steps: 0,
    };

    /// A budget limited only by discovery steps.
    pub const fn steps(max_steps: u32) -> Self {
        Self {
            time: Duration::MAX,
            max_steps,
        }
    }

    fn time_exceeded(&self, started: Instant) -> bool {
        started.elapsed() >= self.time
    }

    fn exceeded(&self, started: Instant, steps: u32) -> bool {
        (self.max_steps > 0 && steps >= self.max_steps) || self.time_exceeded(started)
    }
}

impl Default for SliceBudget {
    fn default() -> Self {
        Self {
            time: Duration::from_millis(100),
            max_steps: 0,
        }
    }
}

/// What a running task may touch. Built fresh for every `resume` call.
pub struct TaskContext<'a> {
    pub pool: &'a mut SurfacePool,
    pub active: &'a mut ActiveChunks,
    pub renderer: &'a CurveRenderer,
    pub equation: &'a Equation,
    /// Stroke width in world units.
    pub stroke_width: f64,
    /// Content revision chunks must be rendered at.
    pub revision: u64,
}

/// Counters accumulated over a task's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskStats {
    /// Slices run, including the final one.
    pub slices: u32,
    /// Active chunks released because the chunk size changed.
    pub drained: usize,
    /// Active chunks released because they left the view.
    pub culled: usize,
    /// Coordinates the flood fill found visible.
    pub visible: usize,
    /// Coordinates the flood fill rejected.
    pub rejected: usize,
    /// Chunks acquired from the pool and rendered.
    pub rendered: usize,
    /// Active chunks re-rendered in place at a newer revision.
    pub refreshed: usize,
}

/// One streaming pass for a fixed camera state.
#[derive(Debug)]
pub struct StreamingTask {
    generation: u64,
    camera: CameraView,
    chunk_size: f64,
    phase: TaskPhase,
    fill: FloodFill,
    stats: TaskStats,
}

impl StreamingTask {
    /// Prepare a task that will lay out `chunk_size` chunks around `camera`.
    pub fn new(generation: u64, camera: CameraView, chunk_size: f64) -> Self {
        assert!(
            chunk_size.is_finite() && chunk_size > 0.0,
            "chunk size must be positive, got {chunk_size}"
        );
        Self {
            generation,
            camera,
            chunk_size,
            phase: TaskPhase::Culling,
            fill: FloodFill::new(&camera, chunk_size),
            stats: TaskStats::default(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn camera(&self) -> &CameraView {
        &self.camera
    }

    pub fn chunk_size(&self) -> f64 {
        self.chunk_size
    }

    pub fn phase(&self) -> TaskPhase {
        self.phase
    }

    /// True until the first `resume`. A fresh task has rendered nothing yet,
    /// so it picks up content changes made before it runs.
    pub fn is_fresh(&self) -> bool {
        self.stats.slices == 0
    }

    pub fn is_done(&self) -> bool {
        self.phase == TaskPhase::Done
    }

    pub fn stats(&self) -> TaskStats {
        self.stats
    }

    /// Run until the pass completes or `budget` is spent.
    ///
    /// Every slice makes progress: the budget is checked only after a unit
    /// of work, so even a zero budget advances by one step per call.
    pub fn resume(&mut self, ctx: &mut TaskContext<'_>, budget: SliceBudget) -> TaskStatus {
        if self.phase == TaskPhase::Done {
            return TaskStatus::Done;
        }
        let started = Instant::now();
        let mut steps = 0u32;
        self.stats.slices += 1;

        loop {
            match self.phase {
                TaskPhase::Culling => {
                    self.cull(ctx);
                    self.phase = TaskPhase::MaybeYield;
                }
                TaskPhase::MaybeYield => {
                    self.phase = TaskPhase::Discovering;
                    if budget.time_exceeded(started) {
                        trace!(generation = self.generation, "yielding after cull");
                        return TaskStatus::Yielded;
                    }
                }
                TaskPhase::Discovering => {
                    let step_started = Instant::now();
                    match self.fill.step(&self.camera) {
                        None => {
                            self.phase = TaskPhase::Done;
                            debug!(
                                generation = self.generation,
                                chunk_size = self.chunk_size,
                                slices = self.stats.slices,
                                visible = self.stats.visible,
                                rendered = self.stats.rendered,
                                refreshed = self.stats.refreshed,
                                culled = self.stats.culled,
                                drained = self.stats.drained,
                                "streaming task complete"
                            );
                            return TaskStatus::Done;
                        }
                        Some(Visit::Visible(coord)) => {
                            self.stats.visible += 1;
                            self.ensure_rendered(ctx, coord);
                        }
                        Some(Visit::Culled(_)) => self.stats.rejected += 1,
                    }
                    let step_time = step_started.elapsed();
                    if !budget.time.is_zero() && step_time > budget.time {
                        warn!(
                            generation = self.generation,
                            elapsed_ms = step_time.as_millis() as u64,
                            "single chunk exceeded the slice budget"
                        );
                    }
                    steps += 1;
                    if !self.fill.is_done() && budget.exceeded(started, steps) {
                        trace!(generation = self.generation, steps, "yielding mid-discovery");
                        return TaskStatus::Yielded;
                    }
                }
                TaskPhase::Done => return TaskStatus::Done,
            }
        }
    }

    fn cull(&mut self, ctx: &mut TaskContext<'_>) {
        if ctx.active.chunk_size() != Some(self.chunk_size) {
            self.stats.drained = ctx.pool.drain(ctx.active);
            ctx.active.set_chunk_size(self.chunk_size);
            debug!(
                generation = self.generation,
                chunk_size = self.chunk_size,
                drained = self.stats.drained,
                "chunk size changed"
            );
        } else {
            self.stats.culled = cull_stale(ctx.active, ctx.pool, &self.camera);
        }
    }

    fn ensure_rendered(&mut self, ctx: &mut TaskContext<'_>, coord: ChunkCoord) {
        let size = self.chunk_size;
        if let Some(drawable) = ctx.active.get_mut(coord) {
            if drawable.revision() != ctx.revision {
                render_chunk(ctx.renderer, ctx.equation, ctx.stroke_width, ctx.revision, drawable);
                self.stats.refreshed += 1;
            }
            return;
        }

        let mut drawable = ctx.pool.acquire();
        drawable.set_transform(coord.center(size), size);
        render_chunk(ctx.renderer, ctx.equation, ctx.stroke_width, ctx.revision, &mut drawable);
        trace!(%coord, id = %drawable.id(), "chunk streamed in");
        ctx.active.insert(coord, drawable);
        self.stats.rendered += 1;
    }
}

fn render_chunk(
    renderer: &CurveRenderer,
    equation: &Equation,
    stroke_width: f64,
    revision: u64,
    drawable: &mut ChunkDrawable,
) {
    let center = drawable.center();
    let size = drawable.size();
    renderer.render(
        drawable.surface_mut(),
        center,
        size,
        &|x| equation.eval(x),
        stroke_width,
    );
    drawable.set_revision(revision);
}
