//! Value types shared between events, the controller and its hosts

use serde::{Deserialize, Serialize};
use std::fmt;

/// The zone the controller has committed to audibly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalZone {
    Outside,
    Inside,
}

impl LogicalZone {
    /// Zone implied by an occupancy state
    pub fn from_occupied(occupied: bool) -> Self {
        match occupied {
            true => LogicalZone::Inside,
            false => LogicalZone::Outside,
        }
    }
}

impl fmt::Display for LogicalZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalZone::Outside => f.write_str("outside"),
            LogicalZone::Inside => f.write_str("inside"),
        }
    }
}

/// One of the two symmetric playback channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelId {
    A,
    B,
}

impl ChannelId {
    /// The other channel
    pub fn other(self) -> Self {
        match self {
            ChannelId::A => ChannelId::B,
            ChannelId::B => ChannelId::A,
        }
    }

    /// Index into a two-element channel array
    pub fn index(self) -> usize {
        match self {
            ChannelId::A => 0,
            ChannelId::B => 1,
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelId::A => f.write_str("A"),
            ChannelId::B => f.write_str("B"),
        }
    }
}
