//! # Ambient Common Library
//!
//! Shared code for the ambient zone audio crates including:
//! - Error types
//! - Clip descriptors
//! - Configuration loading
//! - Event types (AmbientEvent enum) and the event bus
//! - Fade curve definitions and calculations
//! - Time utilities

pub mod clip;
pub mod config;
pub mod error;
pub mod events;
pub mod fade_curves;
pub mod time;

pub use clip::Clip;
pub use config::{AmbientSettings, PlaybackPolicy};
pub use error::{Error, Result};
pub use events::{AmbientEvent, ChannelId, EventBus, LogicalZone};
pub use fade_curves::{FadeCurve, FadeEasing};
