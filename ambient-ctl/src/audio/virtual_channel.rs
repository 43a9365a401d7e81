//! In-memory audio channel
//!
//! Keeps the channel state a real engine would own and logs every transport
//! change, so scenario replays and tests can observe exactly what the
//! controller asked for.

use super::{clip_name, AudioChannel};
use ambient_common::Clip;
use tracing::trace;

/// Audio channel without an audio device behind it
#[derive(Debug, Clone)]
pub struct VirtualChannel {
    label: String,
    clip: Option<Clip>,
    playing: bool,
    volume: f32,
    looping: bool,
    spatial_blend: f32,
    play_count: u32,
    stop_count: u32,
}

impl VirtualChannel {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            clip: None,
            playing: false,
            volume: 1.0,
            looping: false,
            spatial_blend: 0.0,
            play_count: 0,
            stop_count: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of `play()` calls so far
    pub fn play_count(&self) -> u32 {
        self.play_count
    }

    /// Number of `stop()` calls so far
    pub fn stop_count(&self) -> u32 {
        self.stop_count
    }
}

impl AudioChannel for VirtualChannel {
    fn set_clip(&mut self, clip: Option<Clip>) {
        self.clip = clip;
    }

    fn clip(&self) -> Option<&Clip> {
        self.clip.as_ref()
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn looping(&self) -> bool {
        self.looping
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_spatial_blend(&mut self, spatial_blend: f32) {
        self.spatial_blend = spatial_blend;
    }

    fn spatial_blend(&self) -> f32 {
        self.spatial_blend
    }

    fn play(&mut self) {
        // Playing without a clip is silence, same as an engine audio source
        self.playing = self.clip.is_some();
        self.play_count += 1;
        trace!(
            "[channel {}] play {:?} (loop={}, volume={:.3})",
            self.label,
            clip_name(&*self),
            self.looping,
            self.volume
        );
    }

    fn stop(&mut self) {
        self.playing = false;
        self.stop_count += 1;
        trace!("[channel {}] stop", self.label);
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}
