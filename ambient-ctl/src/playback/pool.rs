//! Clip pools and clip selection
//!
//! Each logical zone has a pool of clips. A [`ClipSelector`] picks the next
//! clip from a pool according to the [`PlaybackPolicy`]:
//! - **Random**: uniform draw over the pool
//! - **Sequential**: one cursor per pool, used then incremented, wrapped
//!   modulo the pool length. Cursors are never reset, and zone transitions
//!   and manual loop re-triggers advance the same cursor.

use ambient_common::{Clip, LogicalZone, PlaybackPolicy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Ordered, immutable list of clips
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipPool {
    clips: Vec<Clip>,
}

impl ClipPool {
    pub fn new(clips: Vec<Clip>) -> Self {
        Self { clips }
    }

    pub fn get(&self, index: usize) -> Option<&Clip> {
        self.clips.get(index)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }
}

/// The outside and inside pools
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipPools {
    pub outside: ClipPool,
    pub inside: ClipPool,
}

impl ClipPools {
    pub fn for_zone(&self, zone: LogicalZone) -> &ClipPool {
        match zone {
            LogicalZone::Outside => &self.outside,
            LogicalZone::Inside => &self.inside,
        }
    }
}

fn cursor_index(zone: LogicalZone) -> usize {
    match zone {
        LogicalZone::Outside => 0,
        LogicalZone::Inside => 1,
    }
}

/// Picks clips from pools according to the playback policy
#[derive(Debug, Clone)]
pub struct ClipSelector {
    policy: PlaybackPolicy,
    cursors: [usize; 2],
    rng: StdRng,
}

impl ClipSelector {
    /// Create a selector; `seed` makes random selection reproducible
    pub fn new(policy: PlaybackPolicy, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            policy,
            cursors: [0; 2],
            rng,
        }
    }

    pub fn policy(&self) -> PlaybackPolicy {
        self.policy
    }

    /// Sequential cursor of the pool for `zone`
    pub fn cursor(&self, zone: LogicalZone) -> usize {
        self.cursors[cursor_index(zone)]
    }

    /// Select the next clip for `zone` from `pool`
    ///
    /// Returns `None` for an empty pool without touching the cursor.
    pub fn select(&mut self, zone: LogicalZone, pool: &ClipPool) -> Option<Clip> {
        if pool.is_empty() {
            return None;
        }

        let index = match self.policy {
            PlaybackPolicy::Random => self.rng.gen_range(0..pool.len()),
            PlaybackPolicy::Sequential => {
                let cursor = &mut self.cursors[cursor_index(zone)];
                let index = *cursor % pool.len();
                *cursor = cursor.wrapping_add(1);
                index
            }
        };

        pool.get(index).cloned()
    }
}
