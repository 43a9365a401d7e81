//! Integration tests for configuration loading and graceful degradation
//!
//! Covers:
//! - Missing config files fall back to built-in defaults with a warning
//! - Config path priority: CLI argument, `AMBIENT_CONFIG`, platform directory
//! - Fade curves given as preset names or keyframe lists
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate AMBIENT_CONFIG are marked with #[serial].

use ambient_common::config::{resolve_config_path, CONFIG_ENV_VAR};
use ambient_common::fade_curves::{FadeCurve, FadeCurveConfig, FadeEasing, Keyframe};
use ambient_common::{AmbientSettings, Error};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
        master_volume = 0.7
        outside_volume = 0.9

        [[outside_clips]]
        name = "rain"
        length = 12.5
        "#,
    );

    let settings = AmbientSettings::load(file.path()).unwrap();
    assert_eq!(settings.master_volume, 0.7);
    assert_eq!(settings.outside_clips.len(), 1);
    assert_eq!(settings.outside_clips[0].length, 12.5);
    assert!(settings.inside_clips.is_empty());
}

#[test]
fn test_load_unreadable_path_is_config_error() {
    let dir = TempDir::new().unwrap();
    let error = AmbientSettings::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(error, Error::Config(_)));
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");

    let settings = AmbientSettings::load_or_default(Some(&missing)).unwrap();
    assert_eq!(settings, AmbientSettings::default());
}

#[test]
fn test_malformed_file_is_an_error() {
    let file = write_config("fade_steps = \"many\"");
    assert!(AmbientSettings::load_or_default(Some(file.path())).is_err());
}

#[test]
#[serial]
fn test_env_var_used_without_cli_arg() {
    let file = write_config("inside_volume = 0.25");
    env::set_var(CONFIG_ENV_VAR, file.path());

    assert_eq!(resolve_config_path(None), Some(file.path().to_path_buf()));
    let settings = AmbientSettings::load_or_default(None).unwrap();
    assert_eq!(settings.inside_volume, 0.25);

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_cli_arg_beats_env_var() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.toml");

    let cli = PathBuf::from("/tmp/from-cli.toml");
    assert_eq!(resolve_config_path(Some(&cli)), Some(cli.clone()));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_empty_env_var_is_ignored() {
    env::set_var(CONFIG_ENV_VAR, "");

    let resolved = resolve_config_path(None);
    assert_ne!(resolved, Some(PathBuf::new()));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
fn test_keyframe_curve_from_toml() {
    let settings = AmbientSettings::from_toml_str(
        r#"
        fade_curve = [
            { time = 0.0, value = 0.0 },
            { time = 0.5, value = 1.2 },
            { time = 1.0, value = 1.0 },
        ]
        "#,
    )
    .unwrap();

    let easing = settings.fade_curve.build().unwrap();
    assert!((easing.evaluate(0.25) - 0.6).abs() < 1e-6);
    // Overshoot is kept
    assert!((easing.evaluate(0.5) - 1.2).abs() < 1e-6);
    assert!((easing.evaluate(2.0) - 1.0).abs() < 1e-6);
}

#[test]
fn test_preset_curve_from_toml() {
    let settings = AmbientSettings::from_toml_str("fade_curve = \"equal_power\"").unwrap();
    assert_eq!(settings.fade_curve, FadeCurveConfig::Preset(FadeCurve::EqualPower));
}

#[test]
fn test_empty_keyframe_list_fails_to_build() {
    let config = FadeCurveConfig::Keyframes(Vec::<Keyframe>::new());
    assert!(matches!(config.build(), Err(Error::InvalidInput(_))));
}
