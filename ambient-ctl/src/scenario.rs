//! Timed scenario files
//!
//! A scenario is a TOML list of trigger-volume events replayed against a
//! session, either as fast as possible on the session clock or in real time
//! through the service:
//!
//! ```toml
//! end = 20.0
//!
//! [[events]]
//! at = 2.0
//! action = "enter"
//!
//! [[events]]
//! at = 9.5
//! action = "spawn"
//! position = [1.0, 0.0, 1.0]
//! ```

use crate::audio::AudioChannel;
use crate::service::AmbientHandle;
use crate::session::AmbientSession;
use crate::{Error, Result};
use ambient_common::time::secs_to_duration;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::time::Instant;
use tracing::info;

/// What happens at a scenario event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioAction {
    /// The user starts overlapping a trigger volume
    Enter,
    /// The user stops overlapping a trigger volume
    Exit,
    /// The user spawns at a position
    Spawn { position: [f32; 3] },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEvent {
    /// Seconds from session start
    pub at: f64,
    #[serde(flatten)]
    pub action: ScenarioAction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Session time at which the replay stops; defaults to the last event
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

impl Scenario {
    /// Parse and validate a scenario; events are sorted by time
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut scenario: Scenario =
            toml::from_str(content).map_err(|e| Error::Scenario(format!("Failed to parse scenario: {}", e)))?;

        for event in &scenario.events {
            if !event.at.is_finite() || event.at < 0.0 {
                return Err(Error::Scenario(format!("Invalid event time: {}", event.at)));
            }
        }

        // Stable, so events at the same time keep file order
        scenario.events.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Time the replay runs until
    pub fn end_time(&self) -> f64 {
        let last = self.events.last().map_or(0.0, |event| event.at);
        if self.end.is_finite() {
            self.end.max(last)
        } else {
            last
        }
    }
}

/// Replay `scenario` on the session clock as fast as possible
///
/// The session must already be started. Timers due before an event run
/// before it.
pub fn replay_simulated<C: AudioChannel>(session: &mut AmbientSession<C>, scenario: &Scenario) {
    for event in &scenario.events {
        session.advance_to(event.at);
        info!("t={:.3}s {:?}", event.at, event.action);

        match &event.action {
            ScenarioAction::Enter => {
                session.volume_enter();
            }
            ScenarioAction::Exit => {
                session.volume_exit();
            }
            ScenarioAction::Spawn { position } => {
                session.spawn_check(*position);
            }
        }
    }

    session.advance_to(scenario.end_time());
}

/// Replay `scenario` in real time through a running service
pub async fn replay_realtime(handle: &AmbientHandle, scenario: &Scenario) -> Result<()> {
    let origin = Instant::now();

    for event in &scenario.events {
        sleep_until_offset(origin, event.at).await;
        info!("t={:.3}s {:?}", event.at, event.action);

        match &event.action {
            ScenarioAction::Enter => {
                handle.volume_enter().await?;
            }
            ScenarioAction::Exit => {
                handle.volume_exit().await?;
            }
            ScenarioAction::Spawn { position } => {
                handle.spawn_check(*position).await?;
            }
        }
    }

    sleep_until_offset(origin, scenario.end_time()).await;
    Ok(())
}

async fn sleep_until_offset(origin: Instant, secs: f64) {
    let remaining = secs_to_duration(secs).saturating_sub(origin.elapsed());
    tokio::time::sleep(remaining).await;
}
