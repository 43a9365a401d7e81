//! Audio channel seam
//!
//! The controller drives two symmetric playback channels. Hosts implement
//! [`AudioChannel`] on top of whatever their engine exposes (an audio source,
//! a mixer track, ...). [`VirtualChannel`](super::VirtualChannel) is the
//! in-memory implementation used by the CLI and the tests.

use ambient_common::Clip;
use serde::Serialize;

/// One playback channel: a clip slot with volume, loop and spatial settings
pub trait AudioChannel {
    /// Assign the clip the next `play()` starts
    fn set_clip(&mut self, clip: Option<Clip>);

    fn clip(&self) -> Option<&Clip>;

    /// Native engine looping
    fn set_looping(&mut self, looping: bool);

    fn looping(&self) -> bool;

    /// Linear gain, applied immediately
    fn set_volume(&mut self, volume: f32);

    fn volume(&self) -> f32;

    /// 0 = non-positional, 1 = fully positional
    fn set_spatial_blend(&mut self, spatial_blend: f32);

    fn spatial_blend(&self) -> f32;

    /// Start the assigned clip from the beginning
    fn play(&mut self);

    fn stop(&mut self);

    fn is_playing(&self) -> bool;
}

/// Name of the clip assigned to `channel`
pub fn clip_name<C: AudioChannel + ?Sized>(channel: &C) -> Option<&str> {
    channel.clip().map(|clip| clip.name.as_ref())
}

/// Point-in-time view of a channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelState {
    pub clip: Option<String>,
    pub playing: bool,
    pub volume: f32,
    pub looping: bool,
    pub spatial_blend: f32,
}

impl ChannelState {
    /// Capture the state of any channel implementation
    pub fn capture<C: AudioChannel + ?Sized>(channel: &C) -> Self {
        Self {
            clip: clip_name(channel).map(str::to_owned),
            playing: channel.is_playing(),
            volume: channel.volume(),
            looping: channel.looping(),
            spatial_blend: channel.spatial_blend(),
        }
    }
}
