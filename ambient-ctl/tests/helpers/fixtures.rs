use ambient_common::{AmbientSettings, Clip, EventBus, PlaybackPolicy};
use ambient_ctl::audio::VirtualChannel;
use ambient_ctl::AmbientSession;

/// Build clips from (name, length) pairs
pub fn clip_names(clips: &[(&str, f32)]) -> Vec<Clip> {
    clips.iter().map(|(name, length)| Clip::new(*name, *length)).collect()
}

/// Sequential settings with a linear 1s fade in 10 steps
pub fn sequential_settings(outside: &[(&str, f32)], inside: &[(&str, f32)]) -> AmbientSettings {
    AmbientSettings {
        outside_clips: clip_names(outside),
        inside_clips: clip_names(inside),
        play_order: PlaybackPolicy::Sequential,
        fade_duration: 1.0,
        fade_steps: 10,
        ..AmbientSettings::default()
    }
}

/// Session on two virtual channels, publishing on `bus`
pub fn new_session(settings: &AmbientSettings, bus: &EventBus) -> AmbientSession<VirtualChannel> {
    AmbientSession::new(settings, VirtualChannel::new("A"), VirtualChannel::new("B"))
        .expect("valid settings")
        .with_event_bus(bus.clone())
}
