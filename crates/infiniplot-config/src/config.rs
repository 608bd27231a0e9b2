//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_NAME: &str = "infiniplot";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Camera and viewport settings.
    pub view: ViewConfig,
    /// Chunk streaming settings.
    pub streaming: StreamingConfig,
    /// Curve rendering settings.
    pub render: RenderConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Camera and viewport configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    /// View size (camera half-height in world units) the camera starts at
    /// and resets to.
    pub default_view_size: f64,
    /// Smallest view size the zoom controller allows.
    pub min_view_size: f64,
    /// Largest view size the zoom controller allows.
    pub max_view_size: f64,
    /// Viewport width in pixels.
    pub screen_width: u32,
    /// Viewport height in pixels.
    pub screen_height: u32,
    /// Multiplier from view size to stroke width (world units).
    pub relative_scale: f64,
}

/// Chunk streaming configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamingConfig {
    /// Texels per chunk edge. Independent of the chunk's world size.
    pub chunk_resolution: u32,
    /// Number of `f(x)` samples taken across one chunk.
    pub samples_per_chunk: u32,
    /// Factor applied to the view size before snapping to the 1-2-5 ladder.
    pub lod_offset_factor: f64,
    /// Multiplier applied to the LOD step to obtain the chunk size.
    pub chunk_scale_factor: f64,
    /// Wall-clock budget per scheduling slice, in milliseconds.
    pub frame_budget_ms: u64,
    /// Force a yield every N discovery steps (0 disables the throttle).
    pub max_steps_per_slice: u32,
    /// Camera moves smaller than this do not restart streaming.
    /// `0.0` compares by exact equality.
    pub camera_epsilon: f64,
}

/// Curve rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Stroke colour as RGBA.
    pub stroke_color: [u8; 4],
    /// Chunk background colour as RGBA.
    pub background_color: [u8; 4],
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the console output.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_view_size: 3.0,
            min_view_size: 0.1,
            max_view_size: 1000.0,
            screen_width: 1280,
            screen_height: 720,
            relative_scale: 0.01,
        }
    }
}

impl ViewConfig {
    /// Width over height of the viewport.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.screen_width) / f64::from(self.screen_height.max(1))
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_resolution: 512,
            samples_per_chunk: 256,
            lod_offset_factor: 0.4,
            chunk_scale_factor: 1.0,
            frame_budget_ms: 100,
            max_steps_per_slice: 0,
            camera_epsilon: 0.0,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            stroke_color: [64, 160, 255, 255],
            background_color: [0, 0, 0, 0],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

/// Largest chunk surface edge, in texels, a config may ask for.
pub const MAX_CHUNK_RESOLUTION: u32 = 8192;

/// Platform configuration directory for infiniplot.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Validation ---

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive and finite, got {value}"),
        })
    }
}

impl Config {
    /// Check the values the streamer and renderer cannot recover from.
    ///
    /// Run this after CLI overrides; a config that passes never trips the
    /// streaming core's assertions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let view = &self.view;
        positive("view.default_view_size", view.default_view_size)?;
        positive("view.min_view_size", view.min_view_size)?;
        positive("view.max_view_size", view.max_view_size)?;
        positive("view.relative_scale", view.relative_scale)?;
        if view.min_view_size > view.max_view_size {
            return Err(ConfigError::Invalid {
                field: "view.min_view_size",
                reason: format!(
                    "{} exceeds max_view_size {}",
                    view.min_view_size, view.max_view_size
                ),
            });
        }
        if view.screen_width == 0 || view.screen_height == 0 {
            return Err(ConfigError::Invalid {
                field: "view.screen_width",
                reason: format!(
                    "screen must have area, got {}x{}",
                    view.screen_width, view.screen_height
                ),
            });
        }

        let streaming = &self.streaming;
        positive("streaming.lod_offset_factor", streaming.lod_offset_factor)?;
        positive("streaming.chunk_scale_factor", streaming.chunk_scale_factor)?;
        if streaming.samples_per_chunk < 2 {
            return Err(ConfigError::Invalid {
                field: "streaming.samples_per_chunk",
                reason: format!("need at least 2, got {}", streaming.samples_per_chunk),
            });
        }
        if !(1..=MAX_CHUNK_RESOLUTION).contains(&streaming.chunk_resolution) {
            return Err(ConfigError::Invalid {
                field: "streaming.chunk_resolution",
                reason: format!(
                    "must be between 1 and {MAX_CHUNK_RESOLUTION}, got {}",
                    streaming.chunk_resolution
                ),
            });
        }
        if !(streaming.camera_epsilon.is_finite() && streaming.camera_epsilon >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "streaming.camera_epsilon",
                reason: format!("must be zero or positive, got {}", streaming.camera_epsilon),
            });
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("chunk_resolution: 512"));
        assert!(ron_str.contains("frame_budget_ms: 100"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.streaming.lod_offset_factor = 1.0;
        config.render.stroke_color = [255, 0, 0, 255];
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(view: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.streaming, StreamingConfig::default());
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let ron_str = "(streaming: (samples_per_chunk: 64))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.streaming.samples_per_chunk, 64);
        assert_eq!(config.streaming.chunk_resolution, 512);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_aspect_ratio() {
        let view = ViewConfig {
            screen_width: 800,
            screen_height: 400,
            ..ViewConfig::default()
        };
        assert!((view.aspect_ratio() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.view.default_view_size = 10.0;
        config.streaming.max_steps_per_slice = 16;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.streaming.frame_budget_ms = 16;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().streaming.frame_budget_ms, 16);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    fn rejected_field(config: &Config) -> &'static str {
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected an invalid field, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_view() {
        let mut config = Config::default();
        config.view.min_view_size = 0.0;
        assert_eq!(rejected_field(&config), "view.min_view_size");

        let mut config = Config::default();
        config.view.min_view_size = 50.0;
        config.view.max_view_size = 10.0;
        assert_eq!(rejected_field(&config), "view.min_view_size");

        let mut config = Config::default();
        config.view.relative_scale = f64::NAN;
        assert_eq!(rejected_field(&config), "view.relative_scale");

        let mut config = Config::default();
        config.view.default_view_size = -3.0;
        assert_eq!(rejected_field(&config), "view.default_view_size");

        let mut config = Config::default();
        config.view.screen_height = 0;
        assert_eq!(rejected_field(&config), "view.screen_width");
    }

    #[test]
    fn test_validate_rejects_bad_streaming() {
        let mut config = Config::default();
        config.streaming.lod_offset_factor = 0.0;
        assert_eq!(rejected_field(&config), "streaming.lod_offset_factor");

        let mut config = Config::default();
        config.streaming.chunk_scale_factor = f64::INFINITY;
        assert_eq!(rejected_field(&config), "streaming.chunk_scale_factor");

        let mut config = Config::default();
        config.streaming.samples_per_chunk = 1;
        assert_eq!(rejected_field(&config), "streaming.samples_per_chunk");

        let mut config = Config::default();
        config.streaming.chunk_resolution = 0;
        assert_eq!(rejected_field(&config), "streaming.chunk_resolution");

        let mut config = Config::default();
        config.streaming.chunk_resolution = 40_000;
        assert_eq!(rejected_field(&config), "streaming.chunk_resolution");

        let mut config = Config::default();
        config.streaming.camera_epsilon = -1.0;
        assert_eq!(rejected_field(&config), "streaming.camera_epsilon");
    }

    #[test]
    fn test_validate_accepts_resolution_bounds() {
        let mut config = Config::default();
        config.streaming.chunk_resolution = 1;
        assert!(config.validate().is_ok());
        config.streaming.chunk_resolution = MAX_CHUNK_RESOLUTION;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
