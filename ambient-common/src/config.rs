//! Configuration loading and config file resolution
//!
//! The whole configuration surface is loaded once from a TOML file and is
//! immutable afterwards. Every field has a built-in default, so an empty (or
//! missing) file yields a silent but working controller.
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. `AMBIENT_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/ambient-zones/config.toml`)
//! 4. Built-in defaults (no file)

use crate::clip::Clip;
use crate::fade_curves::FadeCurveConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable consulted when no config path is given on the CLI
pub const CONFIG_ENV_VAR: &str = "AMBIENT_CONFIG";

/// Number of discrete steps a cross-fade is split into unless configured
pub const DEFAULT_FADE_STEPS: u32 = 20;

/// Clip selection order within a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPolicy {
    /// Uniform draw over the pool
    #[default]
    Random,
    /// Declaration order, wrapping at the end of the pool
    Sequential,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Axis-aligned trigger volume as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub name: String,
    pub center: [f32; 3],
    pub size: [f32; 3],
}

/// Complete ambient audio configuration
///
/// Durations are in seconds and are intentionally not validated: a zero or
/// negative fade duration means "complete immediately".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientSettings {
    /// Clips played while the user is outside every zone
    pub outside_clips: Vec<Clip>,

    /// Clips played while the user is inside any zone
    pub inside_clips: Vec<Clip>,

    pub play_order: PlaybackPolicy,

    /// Silence between the end of a clip and the next loop. Values > 0
    /// disable native looping and re-trigger playback manually.
    pub clip_loop_interval: f32,

    pub master_volume: f32,
    pub outside_volume: f32,
    pub inside_volume: f32,

    /// 0 = non-positional, 1 = fully positional
    pub spatial_blend: f32,

    pub fade_duration: f32,
    pub fade_steps: u32,
    pub fade_curve: FadeCurveConfig,

    /// Seconds to wait after start before the intro (or outside ambience)
    pub start_delay: f32,

    /// One-off clip played before the ambient loops
    pub intro_clip: Option<Clip>,

    pub enable_debug: bool,
    pub show_zone_gizmos: bool,

    /// Seed for random clip selection; entropy when absent
    pub random_seed: Option<u64>,

    pub logging: LoggingConfig,

    /// Trigger volumes used by hosts without their own geometry
    pub zones: Vec<ZoneConfig>,
}

impl Default for AmbientSettings {
    fn default() -> Self {
        Self {
            outside_clips: Vec::new(),
            inside_clips: Vec::new(),
            play_order: PlaybackPolicy::Random,
            clip_loop_interval: 0.0,
            master_volume: 1.0,
            outside_volume: 1.0,
            inside_volume: 1.0,
            spatial_blend: 0.0,
            fade_duration: 1.0,
            fade_steps: DEFAULT_FADE_STEPS,
            fade_curve: FadeCurveConfig::default(),
            start_delay: 0.0,
            intro_clip: None,
            enable_debug: false,
            show_zone_gizmos: false,
            random_seed: None,
            logging: LoggingConfig::default(),
            zones: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AmbientSettings {
    /// Parse settings from a TOML string and clamp the sliders
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut settings: AmbientSettings = toml::from_str(content)?;
        settings.clamp_sliders();
        Ok(settings)
    }

    /// Load settings from a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let settings = Self::from_toml_str(&content)?;
        info!("Loaded ambient configuration from {:?}", path);
        Ok(settings)
    }

    /// Resolve the config path and load it, falling back to defaults
    ///
    /// A missing file is not fatal: it logs a warning and continues with
    /// built-in defaults. A file that exists but fails to parse is an error.
    pub fn load_or_default(cli_arg: Option<&Path>) -> Result<Self> {
        match resolve_config_path(cli_arg) {
            Some(path) if path.exists() => Self::load(&path),
            Some(path) => {
                warn!("Config file {:?} not found, using built-in defaults", path);
                Ok(Self::default())
            }
            None => {
                info!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Clamp the volume sliders and spatial blend into `[0, 1]`
    pub fn clamp_sliders(&mut self) {
        for (name, value) in [
            ("master_volume", &mut self.master_volume),
            ("outside_volume", &mut self.outside_volume),
            ("inside_volume", &mut self.inside_volume),
            ("spatial_blend", &mut self.spatial_blend),
        ] {
            let clamped = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
            if clamped != *value {
                warn!("{} = {} is outside [0, 1], using {}", name, value, clamped);
                *value = clamped;
            }
        }
    }
}

/// Resolve the configuration file path
///
/// Returns the first candidate in priority order. The CLI and environment
/// candidates are returned even if the file does not exist, so the caller
/// can warn about it; the platform default is only returned if it exists.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().filter(|path| path.exists())
}

/// Platform config file location (`~/.config/ambient-zones/config.toml` on
/// Linux, the equivalent elsewhere)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ambient-zones").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fade_curves::FadeCurve;

    #[test]
    fn test_defaults() {
        let settings = AmbientSettings::default();
        assert_eq!(settings.fade_steps, 20);
        assert_eq!(settings.fade_duration, 1.0);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.play_order, PlaybackPolicy::Random);
        assert_eq!(settings.logging.level, "info");
        assert!(settings.intro_clip.is_none());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let settings = AmbientSettings::from_toml_str("").unwrap();
        assert_eq!(settings, AmbientSettings::default());
    }

    #[test]
    fn test_full_toml() {
        let settings = AmbientSettings::from_toml_str(
            r#"
            play_order = "sequential"
            clip_loop_interval = 2.0
            inside_volume = 0.5
            fade_duration = 3.0
            fade_steps = 10
            fade_curve = "s_curve"
            start_delay = 1.5
            enable_debug = true
            random_seed = 7

            intro_clip = { name = "intro", length = 4.0 }

            [[outside_clips]]
            name = "wind"
            length = 5.0

            [[outside_clips]]
            name = "birds"
            length = 8.0

            [[inside_clips]]
            name = "hum"
            length = 6.0

            [[zones]]
            name = "hall"
            center = [0.0, 1.0, 0.0]
            size = [10.0, 3.0, 10.0]

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(settings.play_order, PlaybackPolicy::Sequential);
        assert_eq!(settings.outside_clips.len(), 2);
        assert_eq!(&*settings.outside_clips[1].name, "birds");
        assert_eq!(settings.inside_clips[0].length, 6.0);
        assert_eq!(settings.fade_curve, FadeCurveConfig::Preset(FadeCurve::SCurve));
        assert_eq!(settings.intro_clip, Some(Clip::new("intro", 4.0)));
        assert_eq!(settings.random_seed, Some(7));
        assert_eq!(settings.zones[0].size, [10.0, 3.0, 10.0]);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn test_sliders_are_clamped() {
        let settings = AmbientSettings::from_toml_str("master_volume = 1.5\nspatial_blend = -0.2").unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.spatial_blend, 0.0);
    }

    #[test]
    fn test_durations_are_not_validated() {
        let settings = AmbientSettings::from_toml_str("fade_duration = -1.0\nfade_steps = 0").unwrap();
        assert_eq!(settings.fade_duration, -1.0);
        assert_eq!(settings.fade_steps, 0);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let error = AmbientSettings::from_toml_str("play_order = \"shuffle\"").unwrap_err();
        assert!(matches!(error, Error::Config(_)));
    }

    #[test]
    fn test_cli_arg_wins() {
        let path = resolve_config_path(Some(Path::new("/tmp/explicit.toml")));
        assert_eq!(path, Some(PathBuf::from("/tmp/explicit.toml")));
    }
}
