//! Emergency rerouting: snapshot, perturb, restore.
//!
//! An episode touches two kinds of road:
//!
//! - **path roads**: each leg of the emergency route; base weight drops by
//!   `path_reduction`, clamped to the network's minimum base weight.
//! - **boundary roads**: roads from a route intersection to an intersection
//!   off the route; base weight rises by `boundary_increase` (diverted
//!   traffic).  Roads joining two non-consecutive route intersections are
//!   neither and stay untouched.
//!
//! The snapshot is keyed by [`RoadId`], i.e. per undirected road, and
//! records the base weight before the first touch.  Restoring writes those
//! values back through the same single road record, so both directions are
//! restored together and congestion changes made in the meantime are kept.

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use tn_core::{EmergencyConfig, EmergencyHandle, RoadId};
use tn_network::{NetworkResult, RoadNetwork, Route};

// ── EmergencyDispatch ─────────────────────────────────────────────────────────

/// What the caller gets back from a successful dispatch: the handle to
/// restore later and the route the emergency vehicle takes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmergencyDispatch {
    pub handle:         EmergencyHandle,
    pub route:          Route,
    /// Roads along the route whose weight was lowered.
    pub path_roads:     usize,
    /// Roads off the route whose weight was raised.
    pub boundary_roads: usize,
}

// ── Episode ───────────────────────────────────────────────────────────────────

/// A perturbed episode awaiting restoration.
#[derive(Clone, Debug)]
pub(crate) struct EmergencyEpisode {
    pub route:    Route,
    /// Original base weight per touched road.
    pub snapshot: BTreeMap<RoadId, u32>,
}

impl EmergencyEpisode {
    pub fn holds(&self, road: RoadId) -> bool {
        self.snapshot.contains_key(&road)
    }
}

// ── Planning ──────────────────────────────────────────────────────────────────

/// Roads an episode will touch, with their pre-perturbation weights.
/// Computed read-only so conflicts can be rejected before any write.
#[derive(Debug, Default)]
pub(crate) struct Perturbation {
    pub path:     Vec<RoadId>,
    pub boundary: Vec<RoadId>,
    pub snapshot: BTreeMap<RoadId, u32>,
}

pub(crate) fn plan(network: &RoadNetwork, route: &Route) -> Perturbation {
    let mut p = Perturbation::default();

    for (a, b) in route.legs() {
        let Some(id) = network.road_between(a, b) else { continue };
        let Some(road) = network.road(id) else { continue };
        if p.snapshot.insert(id, road.base_weight()).is_none() {
            p.path.push(id);
        }
    }

    let on_route: BTreeSet<_> = route.nodes.iter().copied().collect();
    for &node in &route.nodes {
        for (neighbor, id) in network.incident_roads(node) {
            if on_route.contains(&neighbor) || p.snapshot.contains_key(&id) {
                continue;
            }
            let Some(road) = network.road(id) else { continue };
            p.snapshot.insert(id, road.base_weight());
            p.boundary.push(id);
        }
    }
    p
}

// ── Apply / restore ───────────────────────────────────────────────────────────

pub(crate) fn perturb(
    network: &mut RoadNetwork,
    plan: &Perturbation,
    config: &EmergencyConfig,
) -> NetworkResult<()> {
    let floor = network.config().min_base_weight;
    for &id in &plan.path {
        let original = plan.snapshot[&id];
        let lowered = original.saturating_sub(config.path_reduction).max(floor);
        network.set_base_weight(id, lowered)?;
    }
    for &id in &plan.boundary {
        let original = plan.snapshot[&id];
        network.set_base_weight(id, original.saturating_add(config.boundary_increase))?;
    }
    Ok(())
}

/// Write every snapshotted weight back.  Returns the number of roads
/// restored; roads that no longer exist are skipped.
pub(crate) fn restore(
    network: &mut RoadNetwork,
    handle: EmergencyHandle,
    snapshot: &BTreeMap<RoadId, u32>,
) -> usize {
    let mut restored = 0;
    for (&id, &original) in snapshot {
        match network.set_base_weight(id, original) {
            Ok(_) => restored += 1,
            Err(e) => warn!(handle = handle.0, road = id.0, error = %e, "snapshotted road vanished"),
        }
    }
    restored
}
