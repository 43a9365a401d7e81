//! Cross-fade session bookkeeping
//!
//! A fade is split into a fixed number of discrete steps. Progress is kept
//! as an integer step count so that exactly `total_steps` calls reach the
//! end, independent of floating point accumulation.

use ambient_common::ChannelId;

/// An in-progress cross-fade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeSession {
    /// Channel ramping up
    pub incoming: ChannelId,

    /// Channel ramping down
    pub outgoing: ChannelId,

    /// Resting volume of the incoming pool times master volume
    pub target_volume: f32,

    /// Volume of the outgoing channel when the fade started
    pub start_volume: f32,

    /// Total fade duration in seconds (may be zero or negative)
    pub duration: f32,

    pub total_steps: u32,
    pub steps_taken: u32,

    /// Cross-fade generation this session belongs to
    pub generation: u64,
}

impl FadeSession {
    /// Start a fade. Zero steps is treated as a single step.
    pub fn new(
        incoming: ChannelId,
        outgoing: ChannelId,
        target_volume: f32,
        start_volume: f32,
        duration: f32,
        steps: u32,
        generation: u64,
    ) -> Self {
        Self {
            incoming,
            outgoing,
            target_volume,
            start_volume,
            duration,
            total_steps: steps.max(1),
            steps_taken: 0,
            generation,
        }
    }

    /// Whether the fade completes immediately (non-positive or NaN duration)
    pub fn is_instant(&self) -> bool {
        self.duration.is_nan() || self.duration <= 0.0
    }

    /// Time between steps in seconds
    pub fn step_duration(&self) -> f32 {
        match self.is_instant() {
            true => 0.0,
            false => self.duration / self.total_steps as f32,
        }
    }

    /// Seconds of fade that have run
    pub fn elapsed(&self) -> f32 {
        self.steps_taken as f32 * self.step_duration()
    }

    /// elapsed / duration; 1.0 for an instant fade
    pub fn progress(&self) -> f32 {
        match self.is_instant() {
            true => 1.0,
            false => self.steps_taken as f32 / self.total_steps as f32,
        }
    }

    /// Take one step and return the new progress
    ///
    /// An instant fade jumps straight to the end.
    pub fn advance(&mut self) -> f32 {
        self.steps_taken = match self.is_instant() {
            true => self.total_steps,
            false => (self.steps_taken + 1).min(self.total_steps),
        };
        self.progress()
    }

    pub fn is_finished(&self) -> bool {
        self.steps_taken >= self.total_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(duration: f32, steps: u32) -> FadeSession {
        FadeSession::new(ChannelId::A, ChannelId::B, 1.0, 1.0, duration, steps, 1)
    }

    #[test]
    fn test_steps_reach_end_exactly() {
        // 0.1 is not representable; the integer step count still ends on 1.0
        let mut fade = session(1.0, 10);
        for _ in 0..9 {
            fade.advance();
            assert!(!fade.is_finished());
        }
        assert_eq!(fade.advance(), 1.0);
        assert!(fade.is_finished());
        assert!((fade.elapsed() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_instant_fade_finishes_in_one_step() {
        for duration in [0.0, -2.0, f32::NAN] {
            let mut fade = session(duration, 20);
            assert!(fade.is_instant());
            assert_eq!(fade.step_duration(), 0.0);
            assert_eq!(fade.advance(), 1.0);
            assert!(fade.is_finished());
        }
    }

    #[test]
    fn test_zero_steps_is_one_step() {
        let mut fade = session(2.0, 0);
        assert_eq!(fade.total_steps, 1);
        assert_eq!(fade.step_duration(), 2.0);
        assert_eq!(fade.advance(), 1.0);
        assert!(fade.is_finished());
    }

    #[test]
    fn test_step_duration() {
        let fade = session(1.0, 20);
        assert!((fade.step_duration() - 0.05).abs() < 1e-6);
        assert_eq!(fade.progress(), 0.0);
    }
}
