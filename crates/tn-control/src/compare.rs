//! Before/after comparison of live weights.
//!
//! Capture a [`WeightSnapshot`], let the simulation run (congestion ticks,
//! edits, emergencies), then [`compare`](WeightSnapshot::compare) it against
//! the current network to see which roads got slower or faster.  Roads are
//! keyed by their endpoint pair, so a snapshot stays meaningful even across
//! a layout reload.

use std::collections::BTreeMap;

use tn_core::IntersectionId;
use tn_network::{RoadKey, RoadNetwork};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeightTrend {
    Increased,
    Decreased,
    Unchanged,
    /// Present at capture time, gone now.
    Removed,
    /// Not present at capture time.
    Added,
}

/// Live weight of every road at one instant.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightSnapshot {
    weights: BTreeMap<RoadKey, u32>,
}

impl WeightSnapshot {
    pub fn capture(network: &RoadNetwork) -> Self {
        let weights = network
            .roads()
            .map(|(_, road)| (road.key(), road.live_weight()))
            .collect();
        Self { weights }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Captured live weight of the road between `a` and `b`.
    pub fn weight(&self, a: IntersectionId, b: IntersectionId) -> Option<u32> {
        self.weights.get(&RoadKey::new(a, b)).copied()
    }

    /// Trend per road, ordered by road key.  Covers every road in either the
    /// snapshot or the current network.
    pub fn compare(&self, network: &RoadNetwork) -> Vec<(RoadKey, WeightTrend)> {
        let now = Self::capture(network);
        let mut out = Vec::with_capacity(self.weights.len().max(now.weights.len()));

        for (&key, &before) in &self.weights {
            let trend = match now.weights.get(&key) {
                None => WeightTrend::Removed,
                Some(&after) if after > before => WeightTrend::Increased,
                Some(&after) if after < before => WeightTrend::Decreased,
                Some(_) => WeightTrend::Unchanged,
            };
            out.push((key, trend));
        }
        for &key in now.weights.keys() {
            if !self.weights.contains_key(&key) {
                out.push((key, WeightTrend::Added));
            }
        }
        out.sort_by_key(|&(key, _)| key);
        out
    }
}
