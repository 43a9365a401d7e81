//! Zone tracking, clip selection and cross-fade state machine

pub mod controller;
pub mod fade;
pub mod occupancy;
pub mod pool;
pub mod scheduler;

pub use controller::AmbientController;
pub use fade::FadeSession;
pub use occupancy::{OccupancyEdge, OccupancyListener, ZoneOccupancyTracker};
pub use pool::{ClipPool, ClipPools, ClipSelector};
pub use scheduler::{ScheduledTask, Scheduler, TimerQueue};
