use ambient_common::{AmbientEvent, EventBus};
use tokio::sync::broadcast;

/// Collects every event published on a bus
pub struct EventRecorder {
    rx: broadcast::Receiver<AmbientEvent>,
    events: Vec<AmbientEvent>,
}

impl EventRecorder {
    pub fn new(bus: &EventBus) -> Self {
        Self {
            rx: bus.subscribe(),
            events: Vec::new(),
        }
    }

    /// Pull everything published so far
    pub fn drain(&mut self) -> &[AmbientEvent] {
        while let Ok(event) = self.rx.try_recv() {
            self.events.push(event);
        }
        &self.events
    }

    /// Names of clips started, in order
    pub fn started_clips(&mut self) -> Vec<String> {
        self.drain()
            .iter()
            .filter_map(|event| match event {
                AmbientEvent::ClipStarted { clip, .. } => Some(clip.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of events of the given type
    pub fn count(&mut self, event_type: &str) -> usize {
        self.drain()
            .iter()
            .filter(|event| event.event_type() == event_type)
            .count()
    }

    /// Session times of the events of the given type
    pub fn times(&mut self, event_type: &str) -> Vec<f64> {
        self.drain()
            .iter()
            .filter(|event| event.event_type() == event_type)
            .map(|event| event.session_time())
            .collect()
    }
}
