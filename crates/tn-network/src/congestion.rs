//! Congestion model: random refresh and crude load shedding.
//!
//! The model holds only its parameters.  All state lives on the roads of the
//! [`RoadNetwork`] it is applied to, one factor per road, so both endpoints
//! observe every update.

use tracing::debug;

use tn_core::{CongestionConfig, CoreResult, SimRng};

use crate::RoadNetwork;

#[derive(Clone, Debug, PartialEq)]
pub struct CongestionModel {
    min_factor:             f64,
    max_factor:             f64,
    redistribute_threshold: u32,
}

impl CongestionModel {
    /// Fails with `FactorRange` unless the draw range is non-empty and
    /// starts at or above 1.0.
    pub fn new(config: &CongestionConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: &CongestionConfig) -> Self {
        Self {
            min_factor:             config.min_factor,
            max_factor:             config.max_factor,
            redistribute_threshold: config.redistribute_threshold,
        }
    }

    /// Draw a fresh factor in `[min_factor, max_factor)` for every road.
    ///
    /// Roads are visited in `RoadId` order, so a given seed and network
    /// always produce the same factors.  Returns the number of roads updated.
    pub fn refresh(&self, network: &mut RoadNetwork, rng: &mut SimRng) -> usize {
        let mut updated = 0;
        for road in network.roads_mut() {
            road.set_congestion_factor(rng.gen_range(self.min_factor..self.max_factor));
            updated += 1;
        }
        debug!(roads = updated, "congestion refreshed");
        updated
    }

    /// Reset the factor to 1.0 on every road whose live weight exceeds the
    /// configured threshold.  See [`redistribute_above`](Self::redistribute_above).
    pub fn redistribute(&self, network: &mut RoadNetwork) -> usize {
        self.redistribute_above(network, self.redistribute_threshold)
    }

    /// Reset the factor to 1.0 on every road whose live weight is strictly
    /// above `threshold`; leave all other roads untouched.
    ///
    /// This is a blunt load-shedding heuristic, not an optimiser: it does not
    /// move load anywhere, it just forgets congestion on the worst roads.
    /// Returns the number of roads reset.
    pub fn redistribute_above(&self, network: &mut RoadNetwork, threshold: u32) -> usize {
        let mut reset = 0;
        for road in network.roads_mut() {
            if road.live_weight() > threshold {
                road.set_congestion_factor(1.0);
                reset += 1;
            }
        }
        debug!(threshold, roads = reset, "congestion redistributed");
        reset
    }
}

impl Default for CongestionModel {
    fn default() -> Self {
        Self::from_config(&CongestionConfig::default())
    }
}
