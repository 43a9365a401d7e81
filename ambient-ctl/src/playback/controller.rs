//! Ambient cross-fade controller
//!
//! Owns two symmetric audio channels and cross-fades between the outside and
//! inside clip pools as the local user moves in and out of trigger volumes.
//!
//! # Channel roles
//!
//! Exactly one channel is active (incoming) at a time. Every cross-fade swaps
//! the roles: the previously active channel becomes the outgoing one and
//! fades from whatever volume it is at right now (not from the last target)
//! down to silence, while the other channel starts a fresh clip at volume 0
//! and ramps up to the pool's resting volume times master volume.
//!
//! # Timing
//!
//! All timing goes through the [`Scheduler`]: fade steps every
//! `fade_duration / fade_steps` seconds, manual loop re-triggers at
//! `clip.length + clip_loop_interval`, intro and start delay. Scheduled
//! tasks cannot be cancelled; a task that belongs to a superseded cross-fade
//! is recognized by its generation and dropped.
//!
//! # Logical zone
//!
//! `None` until the first zone is committed (after the intro, or earlier if
//! an enter notification races the intro), then `Outside` or `Inside`.

use crate::audio::{AudioChannel, ChannelState};
use crate::playback::fade::FadeSession;
use crate::playback::occupancy::OccupancyListener;
use crate::playback::pool::{ClipPool, ClipPools, ClipSelector};
use crate::playback::scheduler::{ScheduledTask, Scheduler};
use ambient_common::{time, AmbientEvent, AmbientSettings, ChannelId, Clip, EventBus, FadeEasing, LogicalZone};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shortest gap between manual loop re-triggers; anything shorter (including
/// a non-positive `clip.length + clip_loop_interval`) falls back to native
/// looping so the loop cannot re-fire at the same instant
pub const MIN_LOOP_DELAY: f64 = 0.001;

/// Debug chatter, only emitted when `enable_debug` is set
macro_rules! debug_log {
    ($controller:expr, $($arg:tt)*) => {
        if $controller.debug {
            debug!($($arg)*);
        }
    };
}

/// Cross-fade and clip-scheduling state machine
pub struct AmbientController<C: AudioChannel, S: Scheduler> {
    settings: AmbientSettings,
    pools: ClipPools,
    selector: ClipSelector,
    easing: Arc<dyn FadeEasing>,

    channels: [C; 2],
    active: ChannelId,

    zone: Option<LogicalZone>,
    /// Occupancy as last reported by the tracker
    occupied: bool,

    fade: Option<FadeSession>,
    /// Incremented by every cross-fade
    generation: u64,

    scheduler: S,
    events: Option<EventBus>,
    debug: bool,
}

impl<C: AudioChannel, S: Scheduler> AmbientController<C, S> {
    /// Create a controller from settings, two channels and a scheduler
    ///
    /// The first cross-fade (or the intro) lands on `channel_a`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured fade curve is invalid.
    pub fn new(settings: &AmbientSettings, channel_a: C, channel_b: C, scheduler: S) -> ambient_common::Result<Self> {
        let easing: Arc<dyn FadeEasing> = Arc::from(settings.fade_curve.build()?);

        Ok(Self {
            pools: ClipPools {
                outside: ClipPool::new(settings.outside_clips.clone()),
                inside: ClipPool::new(settings.inside_clips.clone()),
            },
            selector: ClipSelector::new(settings.play_order, settings.random_seed),
            easing,
            channels: [channel_a, channel_b],
            // B is "active" so that the first swap makes A the incoming channel
            active: ChannelId::B,
            zone: None,
            occupied: false,
            fade: None,
            generation: 0,
            scheduler,
            events: None,
            debug: settings.enable_debug,
            settings: settings.clone(),
        })
    }

    /// Replace the configured fade curve with a host-provided one
    pub fn with_easing(mut self, easing: Arc<dyn FadeEasing>) -> Self {
        self.easing = easing;
        self
    }

    /// Publish controller events on `bus`
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn settings(&self) -> &AmbientSettings {
        &self.settings
    }

    /// Last committed zone, `None` before the first commit
    pub fn logical_zone(&self) -> Option<LogicalZone> {
        self.zone
    }

    /// Channel currently fading in or resting
    pub fn active_channel(&self) -> ChannelId {
        self.active
    }

    pub fn channel(&self, id: ChannelId) -> &C {
        &self.channels[id.index()]
    }

    pub fn channel_state(&self, id: ChannelId) -> ChannelState {
        ChannelState::capture(self.channel(id))
    }

    /// The fade in progress, if any
    pub fn fade_session(&self) -> Option<&FadeSession> {
        self.fade.as_ref()
    }

    /// Cross-fade generation counter
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Sequential cursor of the pool for `zone`
    pub fn pool_cursor(&self, zone: LogicalZone) -> usize {
        self.selector.cursor(zone)
    }

    /// Whether zone bounds should be drawn; cosmetic only
    pub fn show_zone_visualization(&self) -> bool {
        self.settings.show_zone_gizmos
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Begin the session: intro (after the start delay) then outside ambience
    pub fn start(&mut self) {
        let delay = self.settings.start_delay;
        if delay > 0.0 {
            debug_log!(self, "Start delayed by {}s", delay);
            self.scheduler.schedule(delay as f64, ScheduledTask::StartIntro);
        } else {
            self.start_intro();
        }
    }

    /// Run a task posted earlier through the scheduler
    pub fn dispatch(&mut self, task: ScheduledTask) {
        match task {
            ScheduledTask::StartIntro => self.start_intro(),
            ScheduledTask::IntroFinished => self.finish_intro(),
            ScheduledTask::FadeStep { generation } => {
                if self.fade.is_some_and(|fade| fade.generation == generation) {
                    self.fade_step();
                } else {
                    self.drop_stale(task);
                }
            }
            ScheduledTask::LoopAmbient { zone, generation } => self.loop_ambient(zone, generation),
        }
    }

    /// The user entered the first trigger volume
    pub fn notify_inside(&mut self) {
        debug_log!(self, "NotifyInside");
        self.occupied = true;
        self.commit_zone(LogicalZone::Inside);
    }

    /// The user left the last trigger volume
    pub fn notify_outside(&mut self) {
        debug_log!(self, "NotifyOutside");
        self.occupied = false;
        self.commit_zone(LogicalZone::Outside);
    }

    /// Swap channel roles and fade to a fresh clip from the pool of `zone`
    pub fn cross_fade_to(&mut self, zone: LogicalZone) {
        self.generation += 1;
        let generation = self.generation;

        let outgoing = self.active;
        let incoming = outgoing.other();
        self.active = incoming;

        // The outgoing channel may be mid-fade; continue from where it is
        let start_volume = self.channels[outgoing.index()].volume();
        let target_volume = self.resting_volume(zone) * self.settings.master_volume;

        let chosen = self.selector.select(zone, self.pools.for_zone(zone));
        let loop_delay = chosen.as_ref().and_then(|clip| self.manual_loop_delay(clip));
        let looping = loop_delay.is_none();

        let channel = &mut self.channels[incoming.index()];
        match &chosen {
            Some(clip) => {
                channel.set_clip(Some(clip.clone()));
                channel.set_looping(looping);
                channel.set_volume(0.0);
                channel.set_spatial_blend(self.settings.spatial_blend);
                channel.play();
            }
            None => channel.stop(),
        }

        match &chosen {
            Some(clip) => {
                debug_log!(self, "CrossFadeTo {} on {}: {}", zone, incoming, clip);
                let name = clip.name.to_string();
                self.emit(|session_time, timestamp| AmbientEvent::ClipStarted {
                    channel: incoming,
                    clip: name,
                    looping,
                    session_time,
                    timestamp,
                });
            }
            None => {
                debug_log!(self, "CrossFadeTo {}: pool is empty, fading to silence", zone);
                self.emit(|session_time, timestamp| AmbientEvent::ChannelStopped {
                    channel: incoming,
                    session_time,
                    timestamp,
                });
            }
        }

        let fade = FadeSession::new(
            incoming,
            outgoing,
            target_volume,
            start_volume,
            self.settings.fade_duration,
            self.settings.fade_steps,
            generation,
        );
        let step_delay = fade.step_duration();
        self.fade = Some(fade);

        self.emit(|session_time, timestamp| AmbientEvent::CrossfadeStarted {
            zone,
            incoming,
            outgoing,
            start_volume,
            target_volume,
            session_time,
            timestamp,
        });

        self.scheduler
            .schedule(step_delay as f64, ScheduledTask::FadeStep { generation });

        if let Some(delay) = loop_delay {
            debug_log!(self, "Loop for {} scheduled in {}s", zone, delay);
            self.scheduler
                .schedule(delay, ScheduledTask::LoopAmbient { zone, generation });
        }
    }

    /// Delay until the manual re-trigger of `clip`, `None` for native looping
    fn manual_loop_delay(&self, clip: &Clip) -> Option<f64> {
        let interval = self.settings.clip_loop_interval;
        if interval.is_nan() || interval <= 0.0 {
            return None;
        }

        let delay = clip.length as f64 + interval as f64;
        if delay >= MIN_LOOP_DELAY {
            return Some(delay);
        }

        warn!(
            "Loop delay {}s for {} is too short, using native looping",
            delay, clip
        );
        None
    }

    /// Advance the current fade by one step
    ///
    /// The curve output is used as-is, so overshooting or non-monotonic
    /// curves are audible. Does nothing if no fade is in progress.
    pub fn fade_step(&mut self) {
        let Some(fade) = self.fade.as_mut() else {
            return;
        };

        let position = fade.advance();
        let fade = *fade;
        let t = self.easing.evaluate(position);

        let incoming_volume = t * fade.target_volume;
        self.channels[fade.incoming.index()].set_volume(incoming_volume);
        self.channels[fade.outgoing.index()].set_volume((1.0 - t) * fade.start_volume);

        debug_log!(self, "FadeStep t={} ({}/{})", t, fade.steps_taken, fade.total_steps);

        if !fade.is_finished() {
            self.scheduler.schedule(
                fade.step_duration() as f64,
                ScheduledTask::FadeStep {
                    generation: fade.generation,
                },
            );
            return;
        }

        self.fade = None;
        self.channels[fade.outgoing.index()].stop();

        self.emit(|session_time, timestamp| AmbientEvent::FadeCompleted {
            incoming: fade.incoming,
            final_volume: incoming_volume,
            session_time,
            timestamp,
        });
        self.emit(|session_time, timestamp| AmbientEvent::ChannelStopped {
            channel: fade.outgoing,
            session_time,
            timestamp,
        });
    }

    /// Manual loop re-trigger for `zone`, scheduled by cross-fade `generation`
    ///
    /// Runs only if the zone still matches the current occupancy and the
    /// committed zone, and no other cross-fade happened since; otherwise the
    /// callback is stale and dropped.
    pub fn loop_ambient(&mut self, zone: LogicalZone, generation: u64) {
        debug_log!(self, "LoopAmbient {}", zone);

        let current = LogicalZone::from_occupied(self.occupied);
        if zone != current || self.zone != Some(zone) || generation != self.generation {
            self.drop_stale(ScheduledTask::LoopAmbient { zone, generation });
            return;
        }

        self.emit(|session_time, timestamp| AmbientEvent::LoopRetriggered {
            zone,
            session_time,
            timestamp,
        });
        self.cross_fade_to(zone);
    }

    fn start_intro(&mut self) {
        debug_log!(self, "StartIntro");

        // An enter notification during the start delay already picked the zone
        if let Some(zone) = self.zone {
            debug_log!(self, "Skipping intro, zone already committed to {}", zone);
            return;
        }

        let Some(intro) = self.settings.intro_clip.clone() else {
            self.finish_intro();
            return;
        };

        self.active = self.active.other();
        let volume = self.settings.outside_volume * self.settings.master_volume;

        let channel = &mut self.channels[self.active.index()];
        channel.set_clip(Some(intro.clone()));
        channel.set_looping(false);
        channel.set_volume(volume);
        channel.set_spatial_blend(self.settings.spatial_blend);
        channel.play();

        info!("Playing intro {} on channel {}", intro, self.active);
        let channel = self.active;
        let name = intro.name.to_string();
        self.emit(|session_time, timestamp| AmbientEvent::IntroStarted {
            channel,
            clip: name,
            session_time,
            timestamp,
        });

        let delay = intro.length as f64 + self.settings.clip_loop_interval as f64;
        self.scheduler.schedule(delay, ScheduledTask::IntroFinished);
    }

    fn finish_intro(&mut self) {
        // An enter notification during the intro already picked the zone
        if let Some(zone) = self.zone {
            debug_log!(self, "Intro finished, zone already committed to {}", zone);
            return;
        }

        self.notify_outside();
    }

    fn commit_zone(&mut self, zone: LogicalZone) {
        let old_zone = self.zone.replace(zone);
        if old_zone != Some(zone) {
            info!("Ambient zone: {:?} -> {}", old_zone, zone);
        }

        self.emit(|session_time, timestamp| AmbientEvent::ZoneChanged {
            old_zone,
            new_zone: zone,
            session_time,
            timestamp,
        });
        self.cross_fade_to(zone);
    }

    fn resting_volume(&self, zone: LogicalZone) -> f32 {
        match zone {
            LogicalZone::Outside => self.settings.outside_volume,
            LogicalZone::Inside => self.settings.inside_volume,
        }
    }

    fn drop_stale(&self, task: ScheduledTask) {
        debug_log!(self, "Dropping stale {}", task);
        self.emit(|session_time, timestamp| AmbientEvent::StaleCallbackDropped {
            task: task.to_string(),
            session_time,
            timestamp,
        });
    }

    fn emit<F>(&self, build: F)
    where
        F: FnOnce(f64, DateTime<Utc>) -> AmbientEvent,
    {
        if let Some(bus) = &self.events {
            bus.emit_lossy(build(self.scheduler.now(), time::now()));
        }
    }
}

impl<C: AudioChannel, S: Scheduler> OccupancyListener for AmbientController<C, S> {
    fn entered_inside(&mut self) {
        self.notify_inside();
    }

    fn exited_to_outside(&mut self) {
        self.notify_outside();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{clip_name, VirtualChannel};
    use crate::playback::scheduler::TimerQueue;
    use ambient_common::{FadeCurve, PlaybackPolicy};

    type TestController = AmbientController<VirtualChannel, TimerQueue>;

    fn settings() -> AmbientSettings {
        AmbientSettings {
            outside_clips: vec![Clip::new("wind", 5.0), Clip::new("birds", 6.0)],
            inside_clips: vec![Clip::new("hum", 4.0)],
            play_order: PlaybackPolicy::Sequential,
            inside_volume: 0.5,
            fade_duration: 1.0,
            fade_steps: 10,
            ..AmbientSettings::default()
        }
    }

    fn controller(settings: &AmbientSettings) -> TestController {
        AmbientController::new(
            settings,
            VirtualChannel::new("A"),
            VirtualChannel::new("B"),
            TimerQueue::new(),
        )
        .unwrap()
    }

    fn run_all(controller: &mut TestController, until: f64) {
        while let Some(task) = controller.scheduler_mut().pop_due(until) {
            controller.dispatch(task);
        }
    }

    #[test]
    fn test_start_without_intro_goes_outside() {
        let settings = settings();
        let mut controller = controller(&settings);
        controller.start();

        assert_eq!(controller.logical_zone(), Some(LogicalZone::Outside));
        assert_eq!(controller.active_channel(), ChannelId::A);
        assert_eq!(clip_name(controller.channel(ChannelId::A)), Some("wind"));
        assert!(controller.channel(ChannelId::A).is_playing());
        assert_eq!(controller.channel(ChannelId::A).volume(), 0.0);
        assert!(controller.channel(ChannelId::A).looping());
    }

    #[test]
    fn test_fade_reaches_target_and_stops_outgoing() {
        let settings = settings();
        let mut controller = controller(&settings);
        controller.start();
        run_all(&mut controller, 10.0);

        controller.notify_inside();
        for _ in 0..10 {
            controller.fade_step();
        }

        let incoming = controller.channel(ChannelId::B);
        assert!((incoming.volume() - 0.5).abs() < 1e-6);
        assert!(incoming.is_playing());
        assert!(!controller.channel(ChannelId::A).is_playing());
        assert!(controller.fade_session().is_none());
    }

    #[test]
    fn test_scheduled_fade_steps_are_spaced() {
        let settings = settings();
        let mut controller = controller(&settings);
        controller.start();

        run_all(&mut controller, 0.45);
        let fade = controller.fade_session().unwrap();
        // Steps at 0.1, 0.2, 0.3, 0.4
        assert_eq!(fade.steps_taken, 4);
        assert!((controller.channel(ChannelId::A).volume() - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_stale_fade_steps_are_dropped() {
        let settings = settings();
        let mut controller = controller(&settings);
        controller.start();
        // Superseding fade scheduled while the first step is still pending
        controller.notify_inside();
        run_all(&mut controller, 0.15);

        // Only the second fade advanced, exactly one step
        let fade = controller.fade_session().unwrap();
        assert_eq!(fade.generation, 2);
        assert_eq!(fade.steps_taken, 1);
    }

    #[test]
    fn test_custom_easing_is_used_unclamped() {
        let settings = settings();
        let overshoot: Arc<dyn FadeEasing> = Arc::new(|position: f32| position * 1.5);
        let mut controller = controller(&settings).with_easing(overshoot);
        controller.start();
        for _ in 0..10 {
            controller.fade_step();
        }

        assert!((controller.channel(ChannelId::A).volume() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_preset_curve_from_settings() {
        let mut settings = settings();
        settings.fade_curve = ambient_common::fade_curves::FadeCurveConfig::Preset(FadeCurve::Exponential);
        let mut controller = controller(&settings);
        controller.start();
        for _ in 0..5 {
            controller.fade_step();
        }

        assert!((controller.channel(ChannelId::A).volume() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_spatial_blend_and_master_volume_applied() {
        let mut settings = settings();
        settings.spatial_blend = 0.75;
        settings.master_volume = 0.5;
        let mut controller = controller(&settings);
        controller.start();

        assert_eq!(controller.channel(ChannelId::A).spatial_blend(), 0.75);
        assert!((controller.fade_session().unwrap().target_volume - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_show_zone_visualization_reflects_settings() {
        let mut settings = settings();
        assert!(!controller(&settings).show_zone_visualization());
        settings.show_zone_gizmos = true;
        assert!(controller(&settings).show_zone_visualization());
    }

    #[test]
    fn test_events_are_published() {
        let settings = settings();
        let bus = EventBus::new(64);
        let mut rx = bus.subscribe();
        let mut controller = controller(&settings).with_event_bus(bus);
        controller.start();

        let first = rx.try_recv().unwrap();
        assert!(matches!(
            first,
            AmbientEvent::ZoneChanged {
                old_zone: None,
                new_zone: LogicalZone::Outside,
                ..
            }
        ));
        assert!(matches!(rx.try_recv().unwrap(), AmbientEvent::ClipStarted { channel: ChannelId::A, .. }));
        assert!(matches!(
            rx.try_recv().unwrap(),
            AmbientEvent::CrossfadeStarted {
                incoming: ChannelId::A,
                outgoing: ChannelId::B,
                ..
            }
        ));
    }

    #[test]
    fn test_short_loop_delay_falls_back_to_native_loop() {
        for length in [-5.0, -1.0, f32::NAN] {
            let mut settings = settings();
            settings.outside_clips = vec![Clip::new("wind", length)];
            settings.clip_loop_interval = 1.0;
            let mut controller = controller(&settings);
            controller.start();

            assert!(controller.channel(ChannelId::A).looping());
            // Only the first fade step is pending, no loop re-trigger
            assert_eq!(controller.scheduler().len(), 1);
        }
    }

    #[test]
    fn test_intro_skipped_when_zone_committed_during_start_delay() {
        let mut settings = settings();
        settings.start_delay = 2.0;
        settings.intro_clip = Some(Clip::new("welcome", 3.0));
        let mut controller = controller(&settings);
        controller.start();

        controller.notify_inside();
        run_all(&mut controller, 2.5);

        assert_eq!(controller.active_channel(), ChannelId::A);
        assert_eq!(clip_name(controller.channel(ChannelId::A)), Some("hum"));
        assert!((controller.channel(ChannelId::A).volume() - 0.5).abs() < 1e-5);
        assert_eq!(controller.channel(ChannelId::B).play_count(), 0);
        assert!(controller.scheduler().is_empty());
    }
}
