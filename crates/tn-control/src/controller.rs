//! The `TrafficController` and its operation surface.

use std::collections::BTreeMap;

use tracing::{debug, info};

use tn_core::{EmergencyHandle, IntersectionId, RoadId, SimRng, TrafficConfig};
use tn_network::{
    CongestionModel, DijkstraPathFinder, PathFinder, Road, RoadNetwork, RoadNetworkBuilder, Route,
};

use crate::emergency::{self, EmergencyEpisode};
use crate::{
    ControlError, ControlResult, EmergencyDispatch, NoopObserver, TrafficObserver, WeightSnapshot,
};

// ── TrafficController ─────────────────────────────────────────────────────────

/// Owns the road network and drives every mutation of it.
///
/// The controller is a single logical writer: all mutating methods take
/// `&mut self` and run to completion.  Callers driving it from several
/// threads put it behind a `Mutex` or a command queue; nothing in here
/// locks.
///
/// Emergency episodes stay pending until [`restore`](Self::restore) is
/// called with their handle.  While pending, congestion refresh and
/// redistribution are allowed (they only touch congestion factors), but
/// edits and removals of a held road are rejected, and a new episode that
/// would touch a held road fails with [`ControlError::EmergencyOverlap`].
///
/// Create via [`ControllerBuilder`][crate::ControllerBuilder].
pub struct TrafficController<P: PathFinder = DijkstraPathFinder, O: TrafficObserver = NoopObserver> {
    pub(crate) config:      TrafficConfig,
    pub(crate) network:     RoadNetwork,
    pub(crate) congestion:  CongestionModel,
    pub(crate) path_finder: P,
    pub(crate) observer:    O,

    /// Perturbed episodes keyed by handle.
    pub(crate) pending: BTreeMap<EmergencyHandle, EmergencyEpisode>,

    /// Next handle value; handles are never reused.
    pub(crate) next_handle: u64,
}

impl<P: PathFinder, O: TrafficObserver> TrafficController<P, O> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &TrafficConfig {
        &self.config
    }

    /// Read-only view for drawing roads and labels.
    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    // ── Structure ─────────────────────────────────────────────────────────

    pub fn add_intersection(&mut self, id: IntersectionId) -> bool {
        let added = self.network.add_intersection(id);
        if added {
            self.observer.on_network_changed(&self.network);
        }
        added
    }

    /// Remove an intersection and its roads.  Rejected if any of its roads
    /// is held by a pending emergency.
    pub fn remove_intersection(&mut self, id: IntersectionId) -> ControlResult<Option<usize>> {
        let held = self
            .network
            .incident_roads(id)
            .find_map(|(other, road)| self.held_by(road).map(|h| (other, h)));
        if let Some((other, handle)) = held {
            return Err(ControlError::RoadInEmergency { a: id, b: other, handle });
        }
        let dropped = self.network.remove_intersection(id);
        if dropped.is_some() {
            self.observer.on_network_changed(&self.network);
        }
        Ok(dropped)
    }

    pub fn add_road(
        &mut self,
        a: IntersectionId,
        b: IntersectionId,
        base_weight: u32,
    ) -> ControlResult<RoadId> {
        let before = self.network.road_count();
        let id = self.network.add_road(a, b, base_weight)?;
        if self.network.road_count() != before {
            self.observer.on_network_changed(&self.network);
        }
        Ok(id)
    }

    /// Remove the road between `a` and `b`.  `Ok(None)` if there was none.
    pub fn remove_road(&mut self, a: IntersectionId, b: IntersectionId) -> ControlResult<Option<Road>> {
        self.check_not_held(a, b)?;
        let removed = self.network.remove_road(a, b);
        if removed.is_some() {
            self.observer.on_network_changed(&self.network);
        }
        Ok(removed)
    }

    pub fn edit_weight(
        &mut self,
        a: IntersectionId,
        b: IntersectionId,
        base_weight: u32,
    ) -> ControlResult<()> {
        self.check_not_held(a, b)?;
        self.network.edit_weight(a, b, base_weight)?;
        self.observer.on_network_changed(&self.network);
        Ok(())
    }

    /// Replace the whole network with a freshly built layout.
    ///
    /// The layout is validated completely before anything is swapped, and
    /// the call is rejected while emergencies are pending (their snapshots
    /// refer to roads of the current network).
    pub fn load_layout(&mut self, layout: RoadNetworkBuilder) -> ControlResult<()> {
        if !self.pending.is_empty() {
            return Err(ControlError::EmergencyPending { pending: self.pending.len() });
        }
        let network = layout.build()?;
        if network.config() != &self.config.network {
            return Err(ControlError::NetworkConfigMismatch);
        }
        info!(
            intersections = network.intersection_count(),
            roads = network.road_count(),
            "layout loaded"
        );
        self.network = network;
        self.observer.on_network_changed(&self.network);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn shortest_path(&self, start: IntersectionId, end: IntersectionId) -> ControlResult<Route> {
        Ok(self.path_finder.shortest_path(&self.network, start, end)?)
    }

    pub fn live_weight(&self, a: IntersectionId, b: IntersectionId) -> Option<u32> {
        self.network.live_weight(a, b)
    }

    /// Live weights of every road right now, for a later
    /// [`WeightSnapshot::compare`].
    pub fn capture_weights(&self) -> WeightSnapshot {
        WeightSnapshot::capture(&self.network)
    }

    // ── Congestion ────────────────────────────────────────────────────────

    /// One congestion tick: draw a fresh factor for every road.  Returns the
    /// number of roads updated.
    pub fn refresh_congestion(&mut self, rng: &mut SimRng) -> usize {
        let roads = self.congestion.refresh(&mut self.network, rng);
        self.observer.on_congestion_refreshed(&self.network, roads);
        roads
    }

    /// Reset congestion on roads above the configured threshold.  Returns
    /// the number of roads reset.
    pub fn redistribute(&mut self) -> usize {
        let reset = self.congestion.redistribute(&mut self.network);
        self.observer.on_redistributed(&self.network, reset);
        reset
    }

    // ── Emergencies ───────────────────────────────────────────────────────

    /// Route an emergency vehicle from `start` to `end` and perturb weights
    /// along and around the route.
    ///
    /// Returns `Ok(None)` without touching anything if `end` is unreachable.
    /// Fails with [`ControlError::EmergencyOverlap`] if any road the episode
    /// would touch is held by a pending episode; nothing is modified in that
    /// case either.
    pub fn simulate_emergency(
        &mut self,
        start: IntersectionId,
        end: IntersectionId,
    ) -> ControlResult<Option<EmergencyDispatch>> {
        let route = self.shortest_path(start, end)?;
        if !route.is_reachable() {
            debug!(start = start.0, end = end.0, "no route; emergency skipped");
            return Ok(None);
        }

        let plan = emergency::plan(&self.network, &route);
        for &road in plan.snapshot.keys() {
            if let Some(active) = self.held_by(road) {
                return Err(ControlError::EmergencyOverlap { road, active });
            }
        }

        emergency::perturb(&mut self.network, &plan, &self.config.emergency)?;

        let handle = EmergencyHandle(self.next_handle);
        self.next_handle += 1;

        let dispatch = EmergencyDispatch {
            handle,
            route:          route.clone(),
            path_roads:     plan.path.len(),
            boundary_roads: plan.boundary.len(),
        };
        info!(
            handle = handle.0,
            start = start.0,
            end = end.0,
            path_roads = dispatch.path_roads,
            boundary_roads = dispatch.boundary_roads,
            "emergency dispatched"
        );
        self.pending.insert(handle, EmergencyEpisode { route, snapshot: plan.snapshot });
        self.observer.on_emergency_dispatched(&self.network, &dispatch);
        Ok(Some(dispatch))
    }

    /// End an episode: put every snapshotted base weight back and discard
    /// the snapshot.  Returns the number of roads restored.
    pub fn restore(&mut self, handle: EmergencyHandle) -> ControlResult<usize> {
        let episode = self
            .pending
            .remove(&handle)
            .ok_or(ControlError::UnknownEmergency(handle))?;
        let restored = emergency::restore(&mut self.network, handle, &episode.snapshot);
        info!(handle = handle.0, roads = restored, "emergency restored");
        self.observer.on_emergency_restored(&self.network, handle, restored);
        Ok(restored)
    }

    /// Restore every pending episode, oldest first (shutdown / cancel path).
    /// Returns the total number of roads restored.
    pub fn restore_all(&mut self) -> usize {
        let handles: Vec<EmergencyHandle> = self.pending.keys().copied().collect();
        handles
            .into_iter()
            .filter_map(|h| self.restore(h).ok())
            .sum()
    }

    /// Handles of all pending episodes, oldest first.
    pub fn pending_emergencies(&self) -> impl Iterator<Item = EmergencyHandle> + '_ {
        self.pending.keys().copied()
    }

    /// Route taken by a pending episode.
    pub fn emergency_route(&self, handle: EmergencyHandle) -> Option<&Route> {
        self.pending.get(&handle).map(|e| &e.route)
    }

    /// The pending episode holding `road`, if any.
    pub fn held_by(&self, road: RoadId) -> Option<EmergencyHandle> {
        self.pending
            .iter()
            .find(|(_, episode)| episode.holds(road))
            .map(|(&h, _)| h)
    }

    fn check_not_held(&self, a: IntersectionId, b: IntersectionId) -> ControlResult<()> {
        match self.network.road_between(a, b).and_then(|r| self.held_by(r)) {
            Some(handle) => Err(ControlError::RoadInEmergency { a, b, handle }),
            None => Ok(()),
        }
    }
}
