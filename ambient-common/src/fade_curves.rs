//! Fade curve implementations for cross-fading ambient channels
//!
//! A fade curve maps the normalized fade position (elapsed / duration) to the
//! gain factor `t` applied by the controller. The controller uses whatever
//! the curve returns: a curve is allowed to overshoot `[0, 1]` or to be
//! non-monotonic, and that shape is audible.
//!
//! Three kinds of curves are available:
//! - [`FadeCurve`]: closed-form presets (linear, exponential, ...)
//! - [`KeyframeCurve`]: piecewise-linear keys, loaded from configuration
//! - any `Fn(f32) -> f32` closure, for hosts that compute their own easing

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

/// Maps a normalized fade position to a gain factor
pub trait FadeEasing: Send + Sync {
    /// Evaluate the curve at `position` (nominally 0.0 at fade start and
    /// 1.0 at fade end)
    fn evaluate(&self, position: f32) -> f32;
}

impl<F> FadeEasing for F
where
    F: Fn(f32) -> f32 + Send + Sync,
{
    fn evaluate(&self, position: f32) -> f32 {
        self(position)
    }
}

/// Preset fade curve types
///
/// Each curve type provides a different perceptual quality:
/// - Linear: Constant rate of change (precise, predictable)
/// - Exponential: Slow start, fast finish
/// - Logarithmic: Fast start, slow finish
/// - SCurve: Smooth acceleration and deceleration
/// - EqualPower: Constant perceived loudness during crossfade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeCurve {
    /// Linear: v(t) = t
    Linear,

    /// Exponential: v(t) = t²
    Exponential,

    /// Logarithmic: v(t) = sqrt(t)
    Logarithmic,

    /// S-Curve: v(t) = 0.5 × (1 - cos(π × t))
    #[serde(alias = "cosine", alias = "scurve", alias = "s-curve")]
    SCurve,

    /// Equal-Power: v(t) = sin(t × π/2)
    #[serde(alias = "equalpower")]
    EqualPower,
}

impl FadeCurve {
    /// Calculate the gain at given position
    ///
    /// Position is clamped to `[0.0, 1.0]`, so every preset returns 0.0 at
    /// the start and 1.0 at the end of the fade.
    pub fn calculate(&self, position: f32) -> f32 {
        let t = position.clamp(0.0, 1.0);

        match self {
            FadeCurve::Linear => t,
            FadeCurve::Exponential => t * t,
            FadeCurve::Logarithmic => t.sqrt(),
            FadeCurve::SCurve => 0.5 * (1.0 - (PI * t).cos()),
            FadeCurve::EqualPower => (t * FRAC_PI_2).sin(),
        }
    }

    /// Parse curve from string (configuration files, CLI flags)
    ///
    /// Case insensitive. Accepts `cosine`, `scurve`, `s-curve` and `s_curve`
    /// for the S-Curve and `equalpower` for Equal-Power.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" => Some(FadeCurve::Linear),
            "exponential" => Some(FadeCurve::Exponential),
            "logarithmic" => Some(FadeCurve::Logarithmic),
            "cosine" | "scurve" | "s-curve" | "s_curve" => Some(FadeCurve::SCurve),
            "equal_power" | "equalpower" => Some(FadeCurve::EqualPower),
            _ => None,
        }
    }

    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FadeCurve::Linear => "Linear",
            FadeCurve::Exponential => "Exponential",
            FadeCurve::Logarithmic => "Logarithmic",
            FadeCurve::SCurve => "S-Curve",
            FadeCurve::EqualPower => "Equal Power",
        }
    }

    /// Get all available preset variants
    pub fn all_variants() -> &'static [FadeCurve] {
        &[
            FadeCurve::Linear,
            FadeCurve::Exponential,
            FadeCurve::Logarithmic,
            FadeCurve::SCurve,
            FadeCurve::EqualPower,
        ]
    }
}

impl Default for FadeCurve {
    /// Linear, matching a straight 0→1 animation curve
    fn default() -> Self {
        FadeCurve::Linear
    }
}

impl std::fmt::Display for FadeCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FadeEasing for FadeCurve {
    fn evaluate(&self, position: f32) -> f32 {
        self.calculate(position)
    }
}

/// A single key of a [`KeyframeCurve`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Normalized fade position of this key
    pub time: f32,
    /// Gain at this key (may be outside `[0, 1]`)
    pub value: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Piecewise-linear curve through a list of keys
///
/// Positions before the first key evaluate to the first key's value and
/// positions after the last key to the last key's value.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeCurve {
    keys: Vec<Keyframe>,
}

impl KeyframeCurve {
    /// Build a curve from keys in any order
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `keys` is empty or any key is not
    /// finite.
    pub fn new(mut keys: Vec<Keyframe>) -> Result<Self> {
        if keys.is_empty() {
            return Err(Error::InvalidInput("keyframe curve needs at least one key".to_string()));
        }

        if let Some(key) = keys.iter().find(|key| !key.time.is_finite() || !key.value.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "keyframe ({}, {}) is not finite",
                key.time, key.value
            )));
        }

        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self { keys })
    }

    /// Keys sorted by time
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }
}

impl FadeEasing for KeyframeCurve {
    fn evaluate(&self, position: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];

        if position.is_nan() || position <= first.time {
            return first.value;
        }
        if position >= last.time {
            return last.value;
        }

        // First key strictly after `position`; guaranteed to exist and to be
        // preceded by at least one key because of the bounds checks above.
        let upper = self.keys.partition_point(|key| key.time <= position);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];

        let span = b.time - a.time;
        if span <= 0.0 {
            return b.value;
        }

        a.value + (b.value - a.value) * ((position - a.time) / span)
    }
}

/// Fade curve as written in configuration
///
/// Either a preset name (`fade_curve = "s_curve"`) or a list of keys
/// (`fade_curve = [{ time = 0.0, value = 0.0 }, { time = 1.0, value = 1.0 }]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FadeCurveConfig {
    Preset(FadeCurve),
    Keyframes(Vec<Keyframe>),
}

impl Default for FadeCurveConfig {
    fn default() -> Self {
        FadeCurveConfig::Preset(FadeCurve::default())
    }
}

impl FadeCurveConfig {
    /// Turn the configured curve into something the controller can evaluate
    pub fn build(&self) -> Result<Box<dyn FadeEasing>> {
        match self {
            FadeCurveConfig::Preset(curve) => Ok(Box::new(*curve)),
            FadeCurveConfig::Keyframes(keys) => Ok(Box::new(KeyframeCurve::new(keys.clone())?)),
        }
    }
}
