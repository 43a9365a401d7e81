//! Trigger volumes
//!
//! Axis-aligned boxes used by hosts that have no geometry of their own (the
//! scenario CLI, tests). Each volume checks containment on its own, so a
//! spawn point inside two overlapping volumes produces two synthetic enters.

use crate::playback::{OccupancyEdge, OccupancyListener, ZoneOccupancyTracker};
use ambient_common::config::ZoneConfig;
use serde::Serialize;
use tracing::debug;

/// Wire color of zone gizmos (RGBA)
pub const GIZMO_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

/// Named axis-aligned box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneVolume {
    pub name: String,
    pub center: [f32; 3],
    pub size: [f32; 3],
}

impl ZoneVolume {
    pub fn new(name: impl Into<String>, center: [f32; 3], size: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            center,
            size,
        }
    }

    /// Whether `point` lies inside the box; the boundary counts as inside
    pub fn contains(&self, point: [f32; 3]) -> bool {
        (0..3).all(|axis| {
            let half = self.size[axis].abs() * 0.5;
            (point[axis] - self.center[axis]).abs() <= half
        })
    }
}

impl From<ZoneConfig> for ZoneVolume {
    fn from(config: ZoneConfig) -> Self {
        Self::new(config.name, config.center, config.size)
    }
}

/// Wire-box descriptor for drawing a volume
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneGizmo {
    pub name: String,
    pub center: [f32; 3],
    pub size: [f32; 3],
    pub color: [f32; 4],
}

/// All trigger volumes of a scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneSet {
    volumes: Vec<ZoneVolume>,
}

impl ZoneSet {
    pub fn new(volumes: Vec<ZoneVolume>) -> Self {
        Self { volumes }
    }

    pub fn from_configs(configs: &[ZoneConfig]) -> Self {
        Self::new(configs.iter().cloned().map(ZoneVolume::from).collect())
    }

    pub fn volumes(&self) -> &[ZoneVolume] {
        &self.volumes
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Volumes containing `position`
    pub fn containing(&self, position: [f32; 3]) -> impl Iterator<Item = &ZoneVolume> + '_ {
        self.volumes.iter().filter(move |volume| volume.contains(position))
    }

    /// Spawn containment check
    ///
    /// The local user appeared at `position` without crossing a boundary.
    /// Sends one synthetic enter to `tracker` per containing volume and
    /// returns the edges this produced (at most one).
    pub fn spawn_check<L: OccupancyListener + ?Sized>(
        &self,
        position: [f32; 3],
        tracker: &mut ZoneOccupancyTracker,
        listener: &mut L,
    ) -> Vec<OccupancyEdge> {
        let mut edges = Vec::new();
        for volume in self.containing(position) {
            debug!("Spawned inside zone {}", volume.name);
            if let Some(edge) = tracker.on_volume_enter(listener) {
                edges.push(edge);
            }
        }
        edges
    }

    /// Gizmos for every volume when `show` is set, nothing otherwise
    pub fn gizmos(&self, show: bool) -> Vec<ZoneGizmo> {
        if !show {
            return Vec::new();
        }

        self.volumes
            .iter()
            .map(|volume| ZoneGizmo {
                name: volume.name.clone(),
                center: volume.center,
                size: volume.size,
                color: GIZMO_COLOR,
            })
            .collect()
    }
}
