//! Test helper modules for ambient-ctl integration tests
//!
//! Provides reusable test infrastructure components:
//! - fixtures: settings and session builders
//! - recorder: drains the event bus into a list for assertions

#![allow(dead_code)]

pub mod fixtures;
pub mod recorder;

pub use fixtures::{clip_names, new_session, sequential_settings};
pub use recorder::EventRecorder;
