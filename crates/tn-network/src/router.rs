//! Path-finding trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! `tn-control` calls routing via the [`PathFinder`] trait, so applications
//! can swap in A* or a behavioural model without touching the controller.
//!
//! # Costs
//!
//! Edge cost is always the road's *live* weight at query time, i.e.
//! `floor(base_weight * congestion_factor)`.  A route is only valid for the
//! network state it was computed on.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[cfg(feature = "fx-hash")]
use rustc_hash::FxHashMap as CostMap;
#[cfg(not(feature = "fx-hash"))]
use std::collections::HashMap as CostMap;

use tn_core::IntersectionId;

use crate::{NetworkError, NetworkResult, RoadNetwork};

// ── Route ─────────────────────────────────────────────────────────────────────

/// Result of a path query: intersections from start to end inclusive, plus
/// the summed live weight.
///
/// An empty `nodes` list means the destination is unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub nodes:      Vec<IntersectionId>,
    pub total_cost: u32,
}

impl Route {
    pub fn unreachable() -> Self {
        Self { nodes: Vec::new(), total_cost: 0 }
    }

    pub fn is_reachable(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// `true` if start and end are the same intersection.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Consecutive `(from, to)` pairs along the route.
    pub fn legs(&self) -> impl Iterator<Item = (IntersectionId, IntersectionId)> + '_ {
        self.nodes.windows(2).map(|w| (w[0], w[1]))
    }

    /// `(from, to, live_weight)` for each leg against `network`'s current
    /// state.  A leg whose road has since disappeared reports `None`.
    pub fn leg_weights(
        &self,
        network: &RoadNetwork,
    ) -> Vec<(IntersectionId, IntersectionId, Option<u32>)> {
        self.legs()
            .map(|(a, b)| (a, b, network.live_weight(a, b)))
            .collect()
    }
}

// ── PathFinder trait ──────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.  Read-only over the network.
pub trait PathFinder: Send + Sync {
    /// Compute the cheapest route from `start` to `end` by live weight.
    ///
    /// `start == end` yields the single-node route with cost 0.  An
    /// unreachable `end` yields [`Route::unreachable`], not an error.
    /// Unknown ids fail with [`NetworkError::UnknownNode`].
    fn shortest_path(
        &self,
        network: &RoadNetwork,
        start: IntersectionId,
        end: IntersectionId,
    ) -> NetworkResult<Route>;
}

// ── DijkstraPathFinder ────────────────────────────────────────────────────────

/// Dijkstra's algorithm with a binary heap, O((V + E) log V).
///
/// Heap entries are `(cost, id)`, so equal-cost ties pop in ascending id
/// order; together with sorted neighbour iteration this makes the chosen
/// route a pure function of the network state.  The search stops as soon as
/// `end` is popped.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraPathFinder;

impl PathFinder for DijkstraPathFinder {
    fn shortest_path(
        &self,
        network: &RoadNetwork,
        start: IntersectionId,
        end: IntersectionId,
    ) -> NetworkResult<Route> {
        dijkstra(network, start, end)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(
    network: &RoadNetwork,
    start: IntersectionId,
    end: IntersectionId,
) -> NetworkResult<Route> {
    for id in [start, end] {
        if !network.contains_intersection(id) {
            return Err(NetworkError::UnknownNode(id));
        }
    }
    if start == end {
        return Ok(Route { nodes: vec![start], total_cost: 0 });
    }

    // dist[v] = best known cost to reach v.
    let mut dist: CostMap<IntersectionId, u32> = CostMap::default();
    // prev[v] = predecessor of v on the best known path.
    let mut prev: CostMap<IntersectionId, IntersectionId> = CostMap::default();
    dist.insert(start, 0);

    let mut heap: BinaryHeap<Reverse<(u32, IntersectionId)>> = BinaryHeap::new();
    heap.push(Reverse((0, start)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == end {
            return Ok(reconstruct(&prev, end, cost));
        }

        // Skip stale heap entries.
        if dist.get(&node).is_some_and(|&d| cost > d) {
            continue;
        }

        for (neighbor, weight) in network.neighbors(node)? {
            let new_cost = cost.saturating_add(weight);
            if dist.get(&neighbor).is_none_or(|&d| new_cost < d) {
                dist.insert(neighbor, new_cost);
                prev.insert(neighbor, node);
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Ok(Route::unreachable())
}

fn reconstruct(
    prev: &CostMap<IntersectionId, IntersectionId>,
    end: IntersectionId,
    total_cost: u32,
) -> Route {
    let mut nodes = vec![end];
    let mut cur = end;
    while let Some(&p) = prev.get(&cur) {
        nodes.push(p);
        cur = p;
    }
    nodes.reverse();
    Route { nodes, total_cost }
}
