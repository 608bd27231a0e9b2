//! The chunk streamer: owns the pool, the active set and the running task,
//! and turns camera updates into streaming work.

use std::time::Duration;

use tracing::{debug, info};

use infiniplot_coords::CameraView;
use infiniplot_lod::LodSelector;
use infiniplot_raster::{CurveRenderer, Rgba};

use crate::{
    ActiveChunks, Equation, PoolStats, SliceBudget, StreamingTask, SurfaceFactory, SurfacePool,
    TaskContext, TaskStats, TaskStatus,
};

/// Tuning for a [`ChunkStreamer`].
#[derive(Clone, Debug, PartialEq)]
pub struct StreamerConfig {
    /// Texels per chunk surface edge.
    pub resolution: u32,
    /// Function samples per chunk.
    pub samples: u32,
    /// Multiplier applied to the view size before LOD snapping.
    pub lod_offset_factor: f64,
    /// Chunk size as a multiple of the LOD step.
    pub chunk_scale_factor: f64,
    /// Wall-clock budget per [`ChunkStreamer::tick`].
    pub frame_budget: Duration,
    /// Discovery steps per tick; `0` disables the throttle.
    pub max_steps_per_slice: u32,
    /// Camera moves smaller than this are ignored; `0.0` means exact equality.
    pub camera_epsilon: f64,
    /// Initial stroke width in world units.
    pub view_scale: f64,
    pub stroke_color: Rgba,
    pub background: Rgba,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            resolution: 512,
            samples: 256,
            lod_offset_factor: infiniplot_lod::DEFAULT_OFFSET_FACTOR,
            chunk_scale_factor: 1.0,
            frame_budget: Duration::from_millis(100),
            max_steps_per_slice: 0,
            camera_epsilon: 0.0,
            view_scale: 0.03,
            stroke_color: [64, 160, 255, 255],
            background: [0, 0, 0, 0],
        }
    }
}

/// What a [`ChunkStreamer::tick`] accomplished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamStatus {
    /// No task was pending.
    Idle,
    /// The task ran out of budget and will continue next tick.
    Streaming,
    /// The task finished during this tick.
    Completed,
}

/// Streams rendered chunks in and out as the camera moves.
///
/// Call [`update`](Self::update) whenever the camera may have changed and
/// [`tick`](Self::tick) once per frame. A camera change while a task is
/// still running drops that task and starts over from the new state; work
/// the old task already finished stays in the active set and is reused.
pub struct ChunkStreamer {
    config: StreamerConfig,
    selector: LodSelector,
    renderer: CurveRenderer,
    pool: SurfacePool,
    active: ActiveChunks,
    equation: Equation,
    view_scale: f64,
    revision: u64,
    generation: u64,
    task: Option<StreamingTask>,
    last_camera: Option<CameraView>,
    last_stats: Option<TaskStats>,
}

impl ChunkStreamer {
    pub fn new(config: StreamerConfig, equation: Equation) -> Self {
        let pool = SurfacePool::new(config.resolution);
        Self::with_pool(config, equation, pool)
    }

    /// Create a streamer whose pool builds surfaces through `factory`.
    pub fn with_factory(config: StreamerConfig, equation: Equation, factory: SurfaceFactory) -> Self {
        let pool = SurfacePool::with_factory(config.resolution, factory);
        Self::with_pool(config, equation, pool)
    }

    fn with_pool(config: StreamerConfig, equation: Equation, pool: SurfacePool) -> Self {
        assert!(
            config.chunk_scale_factor.is_finite() && config.chunk_scale_factor > 0.0,
            "chunk scale factor must be positive"
        );
        let selector = LodSelector::new(config.lod_offset_factor);
        let renderer = CurveRenderer::new(config.samples, config.stroke_color, config.background);
        info!(
            resolution = config.resolution,
            samples = config.samples,
            lod_offset = config.lod_offset_factor,
            budget_ms = config.frame_budget.as_millis() as u64,
            equation = equation.label(),
            "chunk streamer created"
        );
        Self {
            view_scale: config.view_scale,
            config,
            selector,
            renderer,
            pool,
            active: ActiveChunks::new(),
            equation,
            revision: 0,
            generation: 0,
            task: None,
            last_camera: None,
            last_stats: None,
        }
    }

    pub fn config(&self) -> &StreamerConfig {
        &self.config
    }

    /// Chunk edge length the streamer uses at `view_size`.
    pub fn chunk_size_for(&self, view_size: f64) -> f64 {
        self.selector.chunk_size(view_size, self.config.chunk_scale_factor)
    }

    /// Report a camera state.
    ///
    /// Starts a new task and returns `true` when position, view size or
    /// aspect differ from the last reported state; otherwise does nothing.
    pub fn update(&mut self, camera: CameraView) -> bool {
        if let Some(last) = &self.last_camera {
            let unchanged = if self.config.camera_epsilon > 0.0 {
                last.approx_same_view(&camera, self.config.camera_epsilon)
            } else {
                last.same_view(&camera)
            };
            if unchanged {
                return false;
            }
        }
        self.last_camera = Some(camera);
        self.start_task(camera);
        true
    }

    /// Run the current task for one budgeted slice.
    pub fn tick(&mut self) -> StreamStatus {
        let budget = SliceBudget {
            time: self.config.frame_budget,
            max_steps: self.config.max_steps_per_slice,
        };
        self.tick_with(budget)
    }

    /// Run the current task for one slice under an explicit budget.
    pub fn tick_with(&mut self, budget: SliceBudget) -> StreamStatus {
        let Some(task) = self.task.as_mut() else {
            return StreamStatus::Idle;
        };
        let mut ctx = TaskContext {
            pool: &mut self.pool,
            active: &mut self.active,
            renderer: &self.renderer,
            equation: &self.equation,
            stroke_width: self.view_scale,
            revision: self.revision,
        };
        match task.resume(&mut ctx, budget) {
            TaskStatus::Yielded => StreamStatus::Streaming,
            TaskStatus::Done => {
                self.last_stats = Some(task.stats());
                self.task = None;
                StreamStatus::Completed
            }
        }
    }

    /// Tick until the current task completes. Returns the slices run.
    pub fn flush(&mut self) -> u32 {
        let mut slices = 0;
        loop {
            match self.tick() {
                StreamStatus::Idle => return slices,
                StreamStatus::Streaming => slices += 1,
                StreamStatus::Completed => return slices + 1,
            }
        }
    }

    /// Replace the plotted function and re-render every visible chunk.
    pub fn set_equation(&mut self, equation: Equation) {
        info!(equation = equation.label(), "equation changed");
        self.equation = equation;
        self.invalidate_content();
    }

    /// Set the stroke width in world units and re-render every visible chunk.
    pub fn set_view_scale(&mut self, view_scale: f64) {
        debug_assert!(
            view_scale.is_finite() && view_scale > 0.0,
            "view scale must be positive"
        );
        if view_scale == self.view_scale {
            return;
        }
        self.view_scale = view_scale;
        self.invalidate_content();
    }

    /// Start a fresh pass for the last reported camera without changing
    /// anything. Visible chunks already up to date are left alone.
    pub fn refresh(&mut self) {
        if let Some(camera) = self.last_camera {
            self.start_task(camera);
        }
    }

    /// Dispose of every surface, active or pooled, and drop any running
    /// task. Returns the number of surfaces destroyed.
    pub fn destroy_all(&mut self) -> usize {
        self.task = None;
        self.pool.destroy_all(&mut self.active)
    }

    pub fn active_chunks(&self) -> &ActiveChunks {
        &self.active
    }

    /// Chunk size of the current layout, if any chunks were laid out.
    pub fn chunk_size(&self) -> Option<f64> {
        self.active.chunk_size()
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Surfaces waiting on the free list.
    pub fn free_surfaces(&self) -> usize {
        self.pool.free_len()
    }

    pub fn equation(&self) -> &Equation {
        &self.equation
    }

    pub fn view_scale(&self) -> f64 {
        self.view_scale
    }

    /// Content revision, bumped on every equation or view-scale change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of tasks started so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_streaming(&self) -> bool {
        self.task.is_some()
    }

    /// Stats of the most recently completed task.
    pub fn last_stats(&self) -> Option<TaskStats> {
        self.last_stats
    }

    fn invalidate_content(&mut self) {
        self.revision += 1;
        debug!(revision = self.revision, "content invalidated");
        // A task that has not run yet renders at the revision current when it
        // resumes.
        if self.task.as_ref().is_some_and(StreamingTask::is_fresh) {
            return;
        }
        self.refresh();
    }

    fn start_task(&mut self, camera: CameraView) {
        self.generation += 1;
        if let Some(old) = self.task.take() {
            debug!(
                superseded = old.generation(),
                generation = self.generation,
                "dropping unfinished streaming task"
            );
        }
        let chunk_size = self.chunk_size_for(camera.view_size);
        debug!(
            generation = self.generation,
            x = camera.position.x,
            y = camera.position.y,
            view_size = camera.view_size,
            chunk_size,
            "streaming task started"
        );
        self.task = Some(StreamingTask::new(self.generation, camera, chunk_size));
    }
}

impl Drop for ChunkStreamer {
    fn drop(&mut self) {
        let destroyed = self.destroy_all();
        debug!(destroyed, "chunk streamer dropped");
    }
}
