//! # Ambient zone audio controller (ambient-ctl)
//!
//! Plays looping ambient audio and cross-fades between an "outside" and an
//! "inside" clip pool as the local user moves in and out of trigger volumes.
//!
//! **Layers:**
//! - [`playback`]: occupancy tracking, clip selection and the cross-fade
//!   state machine, driven by a host [`playback::Scheduler`]
//! - [`session`]: deterministic host bundling tracker, controller and timers
//! - [`service`]: tokio task serializing access for multi-threaded hosts
//! - [`scenario`]: timed event files for the CLI

pub mod audio;
pub mod error;
pub mod playback;
pub mod scenario;
pub mod service;
pub mod session;
pub mod zones;

pub use error::{Error, Result};
pub use playback::AmbientController;
pub use service::{AmbientHandle, AmbientService};
pub use session::{AmbientSession, SessionSnapshot};
