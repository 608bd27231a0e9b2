//! `infiniplot`: headless chunk-streaming plotter.
//!
//! Loads `config.ron`, applies CLI overrides, then drives the camera along a
//! scripted pan/zoom path while the chunk streamer keeps the visible plane
//! rendered. Optionally runs Newton's method from a starting x and writes a
//! PNG of the final viewport.
//!
//! Run with `cargo run -p infiniplot-app -- --equation cubic --snapshot out.png`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info, warn};

use infiniplot_app::driver::{DemoDriver, demo_script};
use infiniplot_app::equations::{PRESET_NAMES, preset};
use infiniplot_app::frame_loop::{FIXED_DT, FrameLoop};
use infiniplot_app::platform::{PlatformDirs, PlatformError};
use infiniplot_app::root_solver::{DEFAULT_ITERATIONS, NewtonSteps, TangentStep};
use infiniplot_app::snapshot::{self, SnapshotError, Viewport};
use infiniplot_config::{CliArgs, Config};
use infiniplot_lod::grid_spacing;
use infiniplot_raster::Stroke;
use infiniplot_stream::{Equation, StreamStatus};

const TANGENT_COLOR: [u8; 4] = [255, 128, 128, 255];
const DROP_COLOR: [u8; 4] = [128, 255, 128, 255];

#[derive(Debug, Error)]
enum AppError {
    #[error("unknown equation {name:?}, expected one of: {}", PRESET_NAMES.join(", "))]
    UnknownEquation { name: String },
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match &args.config {
        Some(dir) => Ok(PlatformDirs::with_config_dir(dir)),
        None => PlatformDirs::resolve(),
    };
    let dirs = match dirs {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to resolve platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    infiniplot_log::init_logging(Some(&dirs.log_dir), Some(&config));

    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    match run(&args, &config, &dirs) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs, config: &Config, dirs: &PlatformDirs) -> Result<(), AppError> {
    let equation = preset(&args.equation).ok_or_else(|| AppError::UnknownEquation {
        name: args.equation.clone(),
    })?;
    info!(
        equation = equation.label(),
        frames = args.frames,
        config_dir = %dirs.config_dir.display(),
        "infiniplot starting"
    );

    let mut driver = DemoDriver::new(config, equation.clone());
    let mut frames = FrameLoop::new();
    let total = u64::from(args.frames);
    let mut completed = 0u32;
    let mut script_index = 0u64;
    for _ in 0..args.frames {
        let mut pending = 0u32;
        let mut frame_index = 0u64;
        frames.tick_with(FIXED_DT, |_, _| pending += 1, |frame| frame_index = frame);
        for _ in 0..pending {
            driver.apply(demo_script(script_index, total));
            script_index += 1;
        }
        if driver.frame(frame_index).status == StreamStatus::Completed {
            completed += 1;
        }
    }
    let settle_slices = driver.settle();

    let camera = driver.camera().view();
    let streamer = driver.streamer();
    let pool = streamer.pool_stats();
    info!(
        frames = frames.frame_count(),
        tasks_completed = completed,
        settle_slices,
        generations = streamer.generation(),
        active = streamer.active_chunks().len(),
        chunk_size = ?streamer.chunk_size(),
        surfaces_created = pool.created,
        acquired = pool.acquired,
        released = pool.released,
        "scripted run finished"
    );
    info!(
        x = camera.position.x,
        y = camera.position.y,
        view_size = camera.view_size,
        grid_spacing = grid_spacing(camera.view_size),
        "final view"
    );

    let tangents = match args.solve_from {
        Some(x0) => solve_roots(&equation, x0),
        None => Vec::new(),
    };

    if let Some(path) = &args.snapshot {
        let path = snapshot_path(dirs, path)?;
        let viewport = Viewport::new(camera, config.view.screen_width, config.view.screen_height)?;
        let mut image =
            snapshot::compose(&viewport, streamer.active_chunks(), config.render.background_color);
        let width = (streamer.view_scale() / (camera.view_size * 2.0)
            * f64::from(config.view.screen_height))
        .max(1.0);
        for step in &tangents {
            let (from, to) = step.tangent_line();
            let stroke = Stroke {
                width,
                color: TANGENT_COLOR,
            };
            snapshot::overlay_segment(&mut image, &viewport, from, to, stroke);
            if let Some(next_y) = step.next_y {
                let stroke = Stroke {
                    width,
                    color: DROP_COLOR,
                };
                snapshot::overlay_segment(&mut image, &viewport, to, to.with_y(next_y), stroke);
            }
        }
        snapshot::write_png(&path, &image)?;
    }

    Ok(())
}

/// Bare file names land in the snapshot directory; anything with a directory
/// component is used as given.
fn snapshot_path(dirs: &PlatformDirs, path: &Path) -> Result<PathBuf, AppError> {
    if path.parent().is_some_and(|p| !p.as_os_str().is_empty()) {
        return Ok(path.to_path_buf());
    }
    dirs.create_dirs()?;
    Ok(dirs.snapshot_dir.join(path))
}

fn solve_roots(equation: &Equation, x0: f64) -> Vec<TangentStep> {
    if !equation.has_derivative() {
        warn!(equation = equation.label(), "no derivative available, skipping root solve");
        return Vec::new();
    }
    let steps: Vec<TangentStep> = NewtonSteps::new(equation, x0, DEFAULT_ITERATIONS).collect();
    for (i, step) in steps.iter().enumerate() {
        info!(step = i, x = step.from.x, y = step.from.y, next_x = step.root_x, "newton step");
    }
    match steps.last() {
        Some(last) => info!(x0, root = last.root_x, steps = steps.len(), "root found"),
        None => warn!(x0, "root solve made no progress"),
    }
    steps
}
