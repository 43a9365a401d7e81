//! Deterministic single-owner host
//!
//! Bundles the occupancy tracker, the controller, a [`TimerQueue`] and the
//! scene's trigger volumes. Time only moves when the owner calls
//! [`advance`](AmbientSession::advance) or
//! [`advance_to`](AmbientSession::advance_to), which makes the session the
//! natural driver for tests and fast scenario replay.

use crate::audio::{AudioChannel, ChannelState};
use crate::playback::{
    AmbientController, OccupancyEdge, Scheduler, TimerQueue, ZoneOccupancyTracker,
};
use crate::zones::{ZoneGizmo, ZoneSet};
use ambient_common::{AmbientSettings, ChannelId, EventBus, LogicalZone};
use serde::Serialize;

/// Point-in-time view of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Session time in seconds
    pub now: f64,
    pub zone: Option<LogicalZone>,
    pub occupancy: u32,
    pub active_channel: ChannelId,
    /// Channel A then channel B
    pub channels: [ChannelState; 2],
    pub fading: bool,
}

/// Tracker, controller and timers driven by an external clock
pub struct AmbientSession<C: AudioChannel> {
    tracker: ZoneOccupancyTracker,
    controller: AmbientController<C, TimerQueue>,
    zones: ZoneSet,
}

impl<C: AudioChannel> AmbientSession<C> {
    /// Build a session; trigger volumes come from `settings.zones`
    pub fn new(settings: &AmbientSettings, channel_a: C, channel_b: C) -> ambient_common::Result<Self> {
        let controller = AmbientController::new(settings, channel_a, channel_b, TimerQueue::new())?;

        Ok(Self {
            tracker: ZoneOccupancyTracker::new(),
            controller,
            zones: ZoneSet::from_configs(&settings.zones),
        })
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.controller = self.controller.with_event_bus(bus);
        self
    }

    pub fn with_zones(mut self, zones: ZoneSet) -> Self {
        self.zones = zones;
        self
    }

    /// Start delay, intro, then outside ambience
    pub fn start(&mut self) {
        self.controller.start();
    }

    pub fn volume_enter(&mut self) -> Option<OccupancyEdge> {
        self.tracker.on_volume_enter(&mut self.controller)
    }

    pub fn volume_exit(&mut self) -> Option<OccupancyEdge> {
        self.tracker.on_volume_exit(&mut self.controller)
    }

    /// Synthetic enters for every volume containing `position`
    pub fn spawn_check(&mut self, position: [f32; 3]) -> Vec<OccupancyEdge> {
        self.zones
            .spawn_check(position, &mut self.tracker, &mut self.controller)
    }

    /// Run everything due in the next `secs` seconds
    pub fn advance(&mut self, secs: f64) -> usize {
        let target = self.now() + secs.max(0.0);
        self.advance_to(target)
    }

    /// Run every task due at or before `time` in due order, then move the
    /// clock to `time`. Returns the number of dispatched tasks.
    ///
    /// Tasks scheduled by a dispatched task are run in the same call if they
    /// are due in time.
    pub fn advance_to(&mut self, time: f64) -> usize {
        let mut dispatched = 0;
        while let Some(task) = self.controller.scheduler_mut().pop_due(time) {
            self.controller.dispatch(task);
            dispatched += 1;
        }
        self.controller.scheduler_mut().set_now(time);
        dispatched
    }

    pub fn now(&self) -> f64 {
        self.controller.scheduler().now()
    }

    /// Due time of the next pending task
    pub fn next_due(&self) -> Option<f64> {
        self.controller.scheduler().next_due()
    }

    pub fn controller(&self) -> &AmbientController<C, TimerQueue> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AmbientController<C, TimerQueue> {
        &mut self.controller
    }

    pub fn tracker(&self) -> &ZoneOccupancyTracker {
        &self.tracker
    }

    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    /// Zone wire boxes, empty unless visualization is enabled
    pub fn gizmos(&self) -> Vec<ZoneGizmo> {
        self.zones.gizmos(self.controller.show_zone_visualization())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            now: self.now(),
            zone: self.controller.logical_zone(),
            occupancy: self.tracker.count(),
            active_channel: self.controller.active_channel(),
            channels: [
                self.controller.channel_state(ChannelId::A),
                self.controller.channel_state(ChannelId::B),
            ],
            fading: self.controller.fade_session().is_some(),
        }
    }
}
