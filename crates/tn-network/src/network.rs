//! Road network representation and builder.
//!
//! # Data layout
//!
//! Roads live in an arena (`Vec<Option<Road>>`) indexed by [`RoadId`].
//! Each intersection keeps an ordered map from neighbour id to the `RoadId`
//! of the connecting road:
//!
//! ```text
//! adjacency[a][b] == adjacency[b][a] == road_id   →   roads[road_id]
//! ```
//!
//! Both directions read and write the same arena slot, so a weight change is
//! visible from either endpoint by construction.  Removed roads leave a
//! vacant slot; slots are never reused, so a stale `RoadId` resolves to
//! `None` rather than to some unrelated road.
//!
//! Neighbour iteration follows ascending intersection id, which is what
//! makes routing results reproducible.

use std::collections::BTreeMap;

use tracing::{debug, info};

use tn_core::{IntersectionId, NetworkConfig, RoadId};

use crate::{NetworkError, NetworkResult, Road, RoadKey};

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Undirected road graph with per-road congestion state.
///
/// There is no internal locking.  Concurrent readers are fine; a writer needs
/// `&mut self`, so callers sharing one network across threads must provide
/// their own synchronisation.
#[derive(Clone, Debug, Default)]
pub struct RoadNetwork {
    config: NetworkConfig,

    /// Neighbour → road, per intersection.  Every intersection has an entry,
    /// possibly empty.
    adjacency: BTreeMap<IntersectionId, BTreeMap<IntersectionId, RoadId>>,

    /// Road arena.  `None` marks a removed road.
    roads: Vec<Option<Road>>,

    /// Live (non-vacant) road count.
    road_count: usize,
}

impl RoadNetwork {
    /// Construct an empty network that validates with `config`.  Fails
    /// with [`NetworkError::Config`] if the weight bounds are empty or
    /// start at zero.
    pub fn new(config: NetworkConfig) -> NetworkResult<Self> {
        config.validate()?;
        Ok(Self { config, ..Self::default() })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn intersection_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn road_count(&self) -> usize {
        self.road_count
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    // ── Intersections ─────────────────────────────────────────────────────

    /// Add an intersection.  Returns `false` (and changes nothing) if it
    /// already exists.
    pub fn add_intersection(&mut self, id: IntersectionId) -> bool {
        if self.adjacency.contains_key(&id) {
            return false;
        }
        self.adjacency.insert(id, BTreeMap::new());
        debug!(intersection = id.0, "intersection added");
        true
    }

    /// Remove an intersection together with every road touching it.
    ///
    /// Returns the number of roads dropped, or `None` if `id` was absent.
    pub fn remove_intersection(&mut self, id: IntersectionId) -> Option<usize> {
        let neighbours = self.adjacency.remove(&id)?;
        let dropped = neighbours.len();
        for (other, road) in neighbours {
            if let Some(list) = self.adjacency.get_mut(&other) {
                list.remove(&id);
            }
            self.vacate(road);
        }
        debug!(intersection = id.0, roads = dropped, "intersection removed");
        Some(dropped)
    }

    pub fn contains_intersection(&self, id: IntersectionId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// All intersection ids in ascending order.
    pub fn intersections(&self) -> impl Iterator<Item = IntersectionId> + '_ {
        self.adjacency.keys().copied()
    }

    // ── Roads ─────────────────────────────────────────────────────────────

    /// Add an undirected road between `a` and `b`.
    ///
    /// Fails with [`NetworkError::InvalidWeight`] if `base_weight` is outside
    /// the configured bounds, [`NetworkError::SelfLoop`] if `a == b`, and
    /// [`NetworkError::UnknownNode`] if an endpoint is missing (unless
    /// `auto_create_intersections` is set).
    ///
    /// If a road between `a` and `b` already exists (in either direction)
    /// nothing changes and the existing road's id is returned.
    pub fn add_road(
        &mut self,
        a: IntersectionId,
        b: IntersectionId,
        base_weight: u32,
    ) -> NetworkResult<RoadId> {
        self.check_weight(base_weight)?;
        if a == b {
            return Err(NetworkError::SelfLoop(a));
        }
        if !self.config.auto_create_intersections {
            self.require(a)?;
            self.require(b)?;
        }
        if let Some(existing) = self.road_between(a, b) {
            debug!(a = a.0, b = b.0, "road already present; add ignored");
            return Ok(existing);
        }

        self.add_intersection(a);
        self.add_intersection(b);

        let id = RoadId(self.roads.len() as u32);
        self.roads.push(Some(Road::new(RoadKey::new(a, b), base_weight)));
        self.road_count += 1;
        for (from, to) in [(a, b), (b, a)] {
            if let Some(list) = self.adjacency.get_mut(&from) {
                list.insert(to, id);
            }
        }
        debug!(a = a.0, b = b.0, base_weight, road = id.0, "road added");
        Ok(id)
    }

    /// Remove the road between `a` and `b` from both endpoints.
    ///
    /// Returns the removed road, or `None` if there was none.
    pub fn remove_road(&mut self, a: IntersectionId, b: IntersectionId) -> Option<Road> {
        let id = self.road_between(a, b)?;
        for (from, to) in [(a, b), (b, a)] {
            if let Some(list) = self.adjacency.get_mut(&from) {
                list.remove(&to);
            }
        }
        let road = self.vacate(id);
        debug!(a = a.0, b = b.0, road = id.0, "road removed");
        road
    }

    /// Set the base weight of the road between `a` and `b`.
    pub fn edit_weight(
        &mut self,
        a: IntersectionId,
        b: IntersectionId,
        base_weight: u32,
    ) -> NetworkResult<()> {
        self.check_weight(base_weight)?;
        let id = self.road_between(a, b).ok_or(NetworkError::NoSuchRoad { a, b })?;
        let road = self.road_mut(id).ok_or(NetworkError::VacantRoad(id))?;
        road.set_base_weight(base_weight);
        debug!(a = a.0, b = b.0, base_weight, "road weight edited");
        Ok(())
    }

    /// Overwrite a road's base weight without bounds checking and return the
    /// previous value.
    ///
    /// Used for transient perturbations (emergency rerouting) that may leave
    /// the user-facing bounds and are undone later with the same call.
    pub fn set_base_weight(&mut self, road: RoadId, base_weight: u32) -> NetworkResult<u32> {
        let r = self.road_mut(road).ok_or(NetworkError::VacantRoad(road))?;
        let previous = r.base_weight();
        r.set_base_weight(base_weight);
        Ok(previous)
    }

    /// Set a road's congestion factor directly.
    pub fn set_congestion(&mut self, road: RoadId, factor: f64) -> NetworkResult<()> {
        // Negated so NaN is rejected too.
        if !(factor >= 1.0) {
            return Err(NetworkError::InvalidFactor(factor));
        }
        let r = self.road_mut(road).ok_or(NetworkError::VacantRoad(road))?;
        r.set_congestion_factor(factor);
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `(neighbour, live_weight)` pairs for `id`, ascending by neighbour.
    pub fn neighbors(
        &self,
        id: IntersectionId,
    ) -> NetworkResult<impl Iterator<Item = (IntersectionId, u32)> + '_> {
        let list = self.adjacency.get(&id).ok_or(NetworkError::UnknownNode(id))?;
        Ok(list.iter().filter_map(move |(&to, &road)| {
            self.road(road).map(|r| (to, r.live_weight()))
        }))
    }

    /// `(neighbour, road)` pairs for `id`, ascending by neighbour.  Empty if
    /// `id` is unknown.
    pub fn incident_roads(
        &self,
        id: IntersectionId,
    ) -> impl Iterator<Item = (IntersectionId, RoadId)> + '_ {
        self.adjacency
            .get(&id)
            .into_iter()
            .flat_map(|list| list.iter().map(|(&to, &road)| (to, road)))
    }

    /// Current congestion-adjusted weight, or `None` if no road connects
    /// `a` and `b`.
    pub fn live_weight(&self, a: IntersectionId, b: IntersectionId) -> Option<u32> {
        self.road_between(a, b)
            .and_then(|id| self.road(id))
            .map(Road::live_weight)
    }

    pub fn road_between(&self, a: IntersectionId, b: IntersectionId) -> Option<RoadId> {
        self.adjacency.get(&a)?.get(&b).copied()
    }

    pub fn road(&self, id: RoadId) -> Option<&Road> {
        self.roads.get(id.index())?.as_ref()
    }

    /// All live roads in ascending `RoadId` (i.e. creation) order.
    pub fn roads(&self) -> impl Iterator<Item = (RoadId, &Road)> + '_ {
        self.roads
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|r| (RoadId(i as u32), r)))
    }

    /// Sum of live weights along consecutive pairs of `path`.
    ///
    /// `None` if `path` is empty or any consecutive pair is not connected.
    /// A single-node path costs 0.
    pub fn path_cost(&self, path: &[IntersectionId]) -> Option<u32> {
        if path.is_empty() {
            return None;
        }
        path.windows(2)
            .try_fold(0u32, |acc, w| Some(acc.saturating_add(self.live_weight(w[0], w[1])?)))
    }

    // ── Crate-internal mutation ───────────────────────────────────────────

    pub(crate) fn road_mut(&mut self, id: RoadId) -> Option<&mut Road> {
        self.roads.get_mut(id.index())?.as_mut()
    }

    pub(crate) fn roads_mut(&mut self) -> impl Iterator<Item = &mut Road> + '_ {
        self.roads.iter_mut().flatten()
    }

    fn vacate(&mut self, id: RoadId) -> Option<Road> {
        let road = self.roads.get_mut(id.index())?.take();
        if road.is_some() {
            self.road_count -= 1;
        }
        road
    }

    fn check_weight(&self, weight: u32) -> NetworkResult<()> {
        if self.config.weight_in_bounds(weight) {
            Ok(())
        } else {
            Err(NetworkError::InvalidWeight {
                weight,
                min: self.config.min_base_weight,
                max: self.config.max_base_weight,
            })
        }
    }

    fn require(&self, id: IntersectionId) -> NetworkResult<()> {
        if self.contains_intersection(id) {
            Ok(())
        } else {
            Err(NetworkError::UnknownNode(id))
        }
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Collect a whole city layout, then validate and materialise it with
/// [`build`](Self::build).
///
/// Intersections are added first, then roads in insertion order, with the
/// same rules as [`RoadNetwork::add_road`]: duplicate roads are skipped and
/// the first weight wins.  `build` either returns a complete network or an
/// error; there is no half-loaded result.
///
/// # Example
///
/// ```
/// use tn_core::{IntersectionId, NetworkConfig};
/// use tn_network::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new(NetworkConfig::default());
/// b.add_intersection(IntersectionId(1));
/// b.add_intersection(IntersectionId(2));
/// b.add_road(IntersectionId(1), IntersectionId(2), 12);
/// let net = b.build().unwrap();
/// assert_eq!(net.intersection_count(), 2);
/// assert_eq!(net.road_count(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct RoadNetworkBuilder {
    config:        NetworkConfig,
    intersections: Vec<IntersectionId>,
    raw_roads:     Vec<RawRoad>,
}

#[derive(Clone, Debug)]
struct RawRoad {
    a:           IntersectionId,
    b:           IntersectionId,
    base_weight: u32,
}

impl RoadNetworkBuilder {
    pub fn new(config: NetworkConfig) -> Self {
        Self { config, intersections: Vec::new(), raw_roads: Vec::new() }
    }

    /// Pre-allocate for the expected number of intersections and roads.
    pub fn with_capacity(config: NetworkConfig, intersections: usize, roads: usize) -> Self {
        Self {
            config,
            intersections: Vec::with_capacity(intersections),
            raw_roads:     Vec::with_capacity(roads),
        }
    }

    pub fn add_intersection(&mut self, id: IntersectionId) {
        self.intersections.push(id);
    }

    pub fn add_road(&mut self, a: IntersectionId, b: IntersectionId, base_weight: u32) {
        self.raw_roads.push(RawRoad { a, b, base_weight });
    }

    /// Consume the builder and produce a [`RoadNetwork`].
    pub fn build(self) -> NetworkResult<RoadNetwork> {
        let mut net = RoadNetwork::new(self.config)?;
        for id in self.intersections {
            net.add_intersection(id);
        }
        for r in &self.raw_roads {
            net.add_road(r.a, r.b, r.base_weight)?;
        }
        info!(
            intersections = net.intersection_count(),
            roads = net.road_count(),
            "road network built"
        );
        Ok(net)
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new(NetworkConfig::default())
    }
}
