//! Event types for the ambient audio event system
//!
//! Events describe what the controller did (zone committed, clip started,
//! fade finished, ...). They are an observation side channel: emitting never
//! fails from the caller's point of view and never changes control flow.

mod shared_types;

pub use shared_types::{ChannelId, LogicalZone};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Ambient controller events
///
/// `session_time` is the controller's scheduler clock in seconds;
/// `timestamp` is wall-clock time of emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AmbientEvent {
    /// The one-shot intro started playing
    IntroStarted {
        channel: ChannelId,
        clip: String,
        session_time: f64,
        timestamp: DateTime<Utc>,
    },

    /// The controller committed to a new logical zone
    ZoneChanged {
        old_zone: Option<LogicalZone>,
        new_zone: LogicalZone,
        session_time: f64,
        timestamp: DateTime<Utc>,
    },

    /// A cross-fade began
    CrossfadeStarted {
        zone: LogicalZone,
        incoming: ChannelId,
        outgoing: ChannelId,
        /// Volume of the outgoing channel captured at fade start
        start_volume: f32,
        target_volume: f32,
        session_time: f64,
        timestamp: DateTime<Utc>,
    },

    /// A clip started on a channel
    ClipStarted {
        channel: ChannelId,
        clip: String,
        looping: bool,
        session_time: f64,
        timestamp: DateTime<Utc>,
    },

    /// The last fade step ran
    FadeCompleted {
        incoming: ChannelId,
        final_volume: f32,
        session_time: f64,
        timestamp: DateTime<Utc>,
    },

    /// A channel stopped playback
    ChannelStopped {
        channel: ChannelId,
        session_time: f64,
        timestamp: DateTime<Utc>,
    },

    /// A manual loop re-trigger fired and was accepted
    LoopRetriggered {
        zone: LogicalZone,
        session_time: f64,
        timestamp: DateTime<Utc>,
    },

    /// A deferred callback from a superseded fade was dropped
    StaleCallbackDropped {
        task: String,
        session_time: f64,
        timestamp: DateTime<Utc>,
    },
}

impl AmbientEvent {
    /// Event type name, as used in the serialized `type` tag
    pub fn event_type(&self) -> &str {
        match self {
            AmbientEvent::IntroStarted { .. } => "IntroStarted",
            AmbientEvent::ZoneChanged { .. } => "ZoneChanged",
            AmbientEvent::CrossfadeStarted { .. } => "CrossfadeStarted",
            AmbientEvent::ClipStarted { .. } => "ClipStarted",
            AmbientEvent::FadeCompleted { .. } => "FadeCompleted",
            AmbientEvent::ChannelStopped { .. } => "ChannelStopped",
            AmbientEvent::LoopRetriggered { .. } => "LoopRetriggered",
            AmbientEvent::StaleCallbackDropped { .. } => "StaleCallbackDropped",
        }
    }

    /// Scheduler time at which the event was emitted
    pub fn session_time(&self) -> f64 {
        match self {
            AmbientEvent::IntroStarted { session_time, .. }
            | AmbientEvent::ZoneChanged { session_time, .. }
            | AmbientEvent::CrossfadeStarted { session_time, .. }
            | AmbientEvent::ClipStarted { session_time, .. }
            | AmbientEvent::FadeCompleted { session_time, .. }
            | AmbientEvent::ChannelStopped { session_time, .. }
            | AmbientEvent::LoopRetriggered { session_time, .. }
            | AmbientEvent::StaleCallbackDropped { session_time, .. } => *session_time,
        }
    }
}

/// Broadcast bus for [`AmbientEvent`]s
///
/// Cloning the bus shares the underlying channel.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AmbientEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// Slow subscribers lose the oldest events once `capacity` is exceeded.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<AmbientEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: AmbientEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
