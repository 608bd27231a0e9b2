//! Command-line argument parsing for infiniplot.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// infiniplot command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "infiniplot", about = "Chunk-streaming function plotter")]
pub struct CliArgs {
    /// Equation preset to plot (sin, cos, parabola, cubic, hyperbola, tan, sqrt).
    #[arg(long, default_value = "sin")]
    pub equation: String,

    /// Starting view size (camera half-height in world units).
    #[arg(long)]
    pub view_size: Option<f64>,

    /// Number of frames the headless driver runs.
    #[arg(long, default_value_t = 240)]
    pub frames: u32,

    /// Streaming budget per frame in milliseconds.
    #[arg(long)]
    pub budget_ms: Option<u64>,

    /// Texels per chunk edge.
    #[arg(long)]
    pub chunk_resolution: Option<u32>,

    /// LOD offset factor.
    #[arg(long)]
    pub lod_offset: Option<f64>,

    /// Run the Newton root solver starting at this x.
    #[arg(long, allow_hyphen_values = true)]
    pub solve_from: Option<f64>,

    /// Write a PNG composite of the final viewport to this path.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(v) = args.view_size {
            self.view.default_view_size = v;
        }
        if let Some(ms) = args.budget_ms {
            self.streaming.frame_budget_ms = ms;
        }
        if let Some(res) = args.chunk_resolution {
            self.streaming.chunk_resolution = res;
        }
        if let Some(offset) = args.lod_offset {
            self.streaming.lod_offset_factor = offset;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs::parse_from([
            "infiniplot",
            "--view-size",
            "12.5",
            "--budget-ms",
            "8",
            "--log-level",
            "debug",
        ]);
        config.apply_cli_overrides(&args);
        assert_eq!(config.view.default_view_size, 12.5);
        assert_eq!(config.streaming.frame_budget_ms, 8);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.streaming.chunk_resolution, 512);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        let args = CliArgs::parse_from(["infiniplot"]);
        config.apply_cli_overrides(&args);
        assert_eq!(config, original);
        assert_eq!(args.equation, "sin");
        assert_eq!(args.frames, 240);
    }

    #[test]
    fn test_bad_overrides_fail_validation() {
        for flag in ["--lod-offset=0", "--chunk-resolution=40000", "--view-size=-1"] {
            let mut config = Config::default();
            let args = CliArgs::parse_from(["infiniplot", flag]);
            config.apply_cli_overrides(&args);
            assert!(
                matches!(config.validate(), Err(crate::ConfigError::Invalid { .. })),
                "{flag} should be rejected"
            );
        }
    }

    #[test]
    fn test_negative_solve_from() {
        let args = CliArgs::parse_from(["infiniplot", "--solve-from", "-2.5"]);
        assert_eq!(args.solve_from, Some(-2.5));
    }
}
