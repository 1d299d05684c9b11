//! Integration tests for tn-control.

#[cfg(test)]
mod helpers {
    pub use tn_core::{EmergencyHandle, IntersectionId, NetworkConfig, RoadId, TrafficConfig};
    pub use tn_network::{RoadNetwork, RoadNetworkBuilder};

    pub use crate::{ControllerBuilder, TrafficController, TrafficObserver};

    pub fn id(n: u32) -> IntersectionId {
        IntersectionId(n)
    }

    /// Defaults, but with the upper weight bound raised so the 40-weight bypass
    /// road of [`diamond`] is legal.
    pub fn test_config() -> TrafficConfig {
        let mut c = TrafficConfig::default();
        c.network.max_base_weight = 40;
        c
    }

    /// ```text
    ///   1 ──10── 2 ──10── 3 ──10── 4
    ///   └──────────── 40 ──────────┘
    /// ```
    pub fn diamond_layout(config: &NetworkConfig) -> RoadNetworkBuilder {
        let mut b = RoadNetworkBuilder::new(config.clone());
        for n in 1..=4 {
            b.add_intersection(id(n));
        }
        b.add_road(id(1), id(2), 10);
        b.add_road(id(2), id(3), 10);
        b.add_road(id(3), id(4), 10);
        b.add_road(id(1), id(4), 40);
        b
    }

    pub fn diamond(config: &TrafficConfig) -> RoadNetwork {
        diamond_layout(&config.network).build().unwrap()
    }

    /// Diamond plus two spurs off the route: 2 ─12─ 5 and 3 ─28─ 6.
    pub fn diamond_with_spurs(config: &TrafficConfig) -> RoadNetwork {
        let mut b = diamond_layout(&config.network);
        b.add_intersection(id(5));
        b.add_intersection(id(6));
        b.add_road(id(2), id(5), 12);
        b.add_road(id(3), id(6), 28);
        b.build().unwrap()
    }

    pub fn controller(network: RoadNetwork) -> TrafficController {
        ControllerBuilder::new(test_config()).network(network).build().unwrap()
    }

    pub fn base(ctl: &TrafficController, a: u32, b: u32) -> u32 {
        let road = ctl.network().road_between(id(a), id(b)).unwrap();
        ctl.network().road(road).unwrap().base_weight()
    }

    pub fn base_weights(net: &RoadNetwork) -> Vec<(RoadId, u32)> {
        net.roads().map(|(rid, r)| (rid, r.base_weight())).collect()
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::helpers::*;
    use tn_core::CoreError;
    use crate::ControlError;

    #[test]
    fn builds_with_empty_network_by_default() {
        let ctl = ControllerBuilder::new(TrafficConfig::default()).build().unwrap();
        assert!(ctl.network().is_empty());
        assert_eq!(ctl.pending_emergencies().count(), 0);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut c = TrafficConfig::default();
        c.congestion.min_factor = 0.0;
        let err = ControllerBuilder::new(c).build().err().unwrap();
        assert!(matches!(err, ControlError::Config(CoreError::FactorRange { .. })));
    }

    #[test]
    fn mismatched_network_config_rejected() {
        let net = diamond(&test_config());
        let err = ControllerBuilder::new(TrafficConfig::default())
            .network(net)
            .build()
            .err()
            .unwrap();
        assert_eq!(err, ControlError::NetworkConfigMismatch);
    }
}

// ── Structure edits ───────────────────────────────────────────────────────────

#[cfg(test)]
mod structure_tests {
    use super::helpers::*;
    use tn_network::NetworkError;
    use crate::ControlError;

    #[test]
    fn edits_go_through_to_network() {
        let mut ctl = controller(diamond(&test_config()));
        assert!(ctl.add_intersection(id(7)));
        ctl.add_road(id(4), id(7), 15).unwrap();
        ctl.edit_weight(id(7), id(4), 20).unwrap();
        assert_eq!(ctl.live_weight(id(4), id(7)), Some(20));
        assert!(ctl.remove_road(id(4), id(7)).unwrap().is_some());
        assert_eq!(ctl.live_weight(id(7), id(4)), None);
        assert_eq!(ctl.remove_intersection(id(7)).unwrap(), Some(0));
    }

    #[test]
    fn network_errors_are_wrapped() {
        let mut ctl = controller(diamond(&test_config()));
        assert_eq!(
            ctl.add_road(id(1), id(3), 2),
            Err(ControlError::Network(NetworkError::InvalidWeight { weight: 2, min: 5, max: 40 }))
        );
        assert_eq!(
            ctl.edit_weight(id(1), id(3), 10),
            Err(ControlError::Network(NetworkError::NoSuchRoad { a: id(1), b: id(3) }))
        );
        assert_eq!(ctl.remove_road(id(1), id(3)), Ok(None));
    }

    #[test]
    fn load_layout_replaces_network() {
        let config = test_config();
        let mut ctl = controller(diamond(&config));
        let mut b = RoadNetworkBuilder::new(config.network.clone());
        b.add_intersection(id(10));
        b.add_intersection(id(11));
        b.add_road(id(10), id(11), 9);
        ctl.load_layout(b).unwrap();
        assert_eq!(ctl.network().intersection_count(), 2);
        assert_eq!(ctl.live_weight(id(10), id(11)), Some(9));
    }

    #[test]
    fn failed_layout_keeps_old_network() {
        let config = test_config();
        let mut ctl = controller(diamond(&config));
        let mut b = RoadNetworkBuilder::new(config.network.clone());
        b.add_road(id(10), id(11), 9); // endpoints never added
        assert!(ctl.load_layout(b).is_err());
        assert_eq!(ctl.network().road_count(), 4);
    }
}

// ── Congestion via controller ─────────────────────────────────────────────────

#[cfg(test)]
mod congestion_tests {
    use super::helpers::*;
    use tn_core::SimRng;

    #[test]
    fn refresh_then_redistribute() {
        let mut ctl = controller(diamond(&test_config()));
        let mut rng = SimRng::new(5);
        assert_eq!(ctl.refresh_congestion(&mut rng), 4);
        let heavy: Vec<_> = ctl
            .network()
            .roads()
            .filter(|(_, r)| r.live_weight() > 20)
            .map(|(rid, _)| rid)
            .collect();
        // The 40-weight bypass is always above the threshold.
        assert!(!heavy.is_empty());
        assert_eq!(ctl.redistribute(), heavy.len());
        for rid in heavy {
            assert_eq!(ctl.network().road(rid).unwrap().congestion_factor(), 1.0);
        }
    }
}

// ── Routing via controller ────────────────────────────────────────────────────

#[cfg(test)]
mod routing_tests {
    use super::helpers::*;

    #[test]
    fn shortest_path_scenario() {
        let ctl = controller(diamond(&test_config()));
        let route = ctl.shortest_path(id(1), id(4)).unwrap();
        assert_eq!(route.nodes, vec![id(1), id(2), id(3), id(4)]);
        assert_eq!(route.total_cost, 30);
    }

    #[test]
    fn shortest_path_to_self() {
        let ctl = controller(diamond(&test_config()));
        let route = ctl.shortest_path(id(2), id(2)).unwrap();
        assert_eq!(route.nodes, vec![id(2)]);
        assert_eq!(route.total_cost, 0);
    }
}

// ── Emergencies ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod emergency_tests {
    use super::helpers::*;
    use tn_core::SimRng;
    use crate::ControlError;

    #[test]
    fn path_roads_drop_to_floor_and_restore() {
        let mut ctl = controller(diamond(&test_config()));
        let dispatch = ctl.simulate_emergency(id(1), id(4)).unwrap().unwrap();
        assert_eq!(dispatch.route.nodes, vec![id(1), id(2), id(3), id(4)]);
        assert_eq!(dispatch.path_roads, 3);
        // 1–4 joins two route intersections: not a boundary road.
        assert_eq!(dispatch.boundary_roads, 0);

        assert_eq!((base(&ctl, 1, 2), base(&ctl, 2, 3), base(&ctl, 3, 4)), (5, 5, 5));
        assert_eq!(base(&ctl, 1, 4), 40);
        assert_eq!(ctl.shortest_path(id(1), id(4)).unwrap().total_cost, 15);

        assert_eq!(ctl.restore(dispatch.handle), Ok(3));
        assert_eq!((base(&ctl, 1, 2), base(&ctl, 2, 3), base(&ctl, 3, 4)), (10, 10, 10));
        assert_eq!(base(&ctl, 1, 4), 40);
        assert_eq!(ctl.pending_emergencies().count(), 0);
    }

    #[test]
    fn boundary_roads_raised_and_restored() {
        let mut ctl = controller(diamond_with_spurs(&test_config()));
        let before = base_weights(ctl.network());
        let dispatch = ctl.simulate_emergency(id(1), id(4)).unwrap().unwrap();
        assert_eq!(dispatch.boundary_roads, 2);
        assert_eq!(base(&ctl, 2, 5), 17);
        // Transient perturbation may exceed the edit bounds.
        assert_eq!(base(&ctl, 3, 6), 33);
        // Symmetric from the other endpoint.
        assert_eq!(ctl.live_weight(id(5), id(2)), Some(17));

        assert_eq!(ctl.restore(dispatch.handle), Ok(5));
        assert_eq!(base_weights(ctl.network()), before);
    }

    #[test]
    fn path_reduction_clamps_at_minimum() {
        let config = test_config();
        let mut b = RoadNetworkBuilder::new(config.network.clone());
        for n in 1..=3 {
            b.add_intersection(id(n));
        }
        b.add_road(id(1), id(2), 12);
        b.add_road(id(2), id(3), 22);
        let mut ctl = controller(b.build().unwrap());
        let d = ctl.simulate_emergency(id(1), id(3)).unwrap().unwrap();
        assert_eq!(base(&ctl, 1, 2), 5);
        assert_eq!(base(&ctl, 2, 3), 12);
        ctl.restore(d.handle).unwrap();
        assert_eq!((base(&ctl, 1, 2), base(&ctl, 2, 3)), (12, 22));
    }

    #[test]
    fn restore_keeps_congestion_changes() {
        let mut ctl = controller(diamond_with_spurs(&test_config()));
        let before = base_weights(ctl.network());
        let d = ctl.simulate_emergency(id(1), id(4)).unwrap().unwrap();

        let mut rng = SimRng::new(3);
        ctl.refresh_congestion(&mut rng);
        ctl.redistribute();
        let factors: Vec<f64> = ctl.network().roads().map(|(_, r)| r.congestion_factor()).collect();

        ctl.restore(d.handle).unwrap();
        assert_eq!(base_weights(ctl.network()), before);
        let after: Vec<f64> = ctl.network().roads().map(|(_, r)| r.congestion_factor()).collect();
        assert_eq!(factors, after);
    }

    #[test]
    fn unreachable_is_a_noop() {
        let config = test_config();
        let mut net = diamond(&config);
        net.add_intersection(id(9));
        let mut ctl = controller(net);
        let before = base_weights(ctl.network());
        assert_eq!(ctl.simulate_emergency(id(1), id(9)), Ok(None));
        assert_eq!(ctl.pending_emergencies().count(), 0);
        assert_eq!(base_weights(ctl.network()), before);
    }

    #[test]
    fn trivial_route_raises_only_boundary_roads() {
        let mut ctl = controller(diamond(&test_config()));
        let d = ctl.simulate_emergency(id(1), id(1)).unwrap().unwrap();
        assert_eq!(d.path_roads, 0);
        assert_eq!(d.boundary_roads, 2);
        assert_eq!(base(&ctl, 1, 2), 15);
        assert_eq!(base(&ctl, 1, 4), 45);
        ctl.restore(d.handle).unwrap();
        assert_eq!((base(&ctl, 1, 2), base(&ctl, 1, 4)), (10, 40));
    }

    #[test]
    fn unknown_start_is_an_error() {
        let mut ctl = controller(diamond(&test_config()));
        assert!(matches!(
            ctl.simulate_emergency(id(42), id(1)),
            Err(ControlError::Network(_))
        ));
    }

    #[test]
    fn overlapping_episode_rejected_without_changes() {
        let mut ctl = controller(diamond(&test_config()));
        let first = ctl.simulate_emergency(id(1), id(4)).unwrap().unwrap();
        let during = base_weights(ctl.network());

        let err = ctl.simulate_emergency(id(2), id(3)).unwrap_err();
        assert!(matches!(err, ControlError::EmergencyOverlap { active, .. } if active == first.handle));
        assert_eq!(base_weights(ctl.network()), during);
        assert_eq!(ctl.pending_emergencies().collect::<Vec<_>>(), vec![first.handle]);
    }

    #[test]
    fn disjoint_episodes_run_side_by_side() {
        let config = test_config();
        let mut b = RoadNetworkBuilder::new(config.network.clone());
        for n in 1..=4 {
            b.add_intersection(id(n));
        }
        b.add_road(id(1), id(2), 20);
        b.add_road(id(3), id(4), 25);
        let mut ctl = controller(b.build().unwrap());

        let a = ctl.simulate_emergency(id(1), id(2)).unwrap().unwrap();
        let c = ctl.simulate_emergency(id(3), id(4)).unwrap().unwrap();
        assert_ne!(a.handle, c.handle);
        assert_eq!((base(&ctl, 1, 2), base(&ctl, 3, 4)), (10, 15));

        assert_eq!(ctl.restore_all(), 2);
        assert_eq!((base(&ctl, 1, 2), base(&ctl, 3, 4)), (20, 25));
        assert_eq!(ctl.pending_emergencies().count(), 0);
    }

    #[test]
    fn restoring_twice_or_unknown_errors() {
        let mut ctl = controller(diamond(&test_config()));
        let d = ctl.simulate_emergency(id(1), id(4)).unwrap().unwrap();
        ctl.restore(d.handle).unwrap();
        assert_eq!(ctl.restore(d.handle), Err(ControlError::UnknownEmergency(d.handle)));
        assert_eq!(
            ctl.restore(EmergencyHandle(77)),
            Err(ControlError::UnknownEmergency(EmergencyHandle(77)))
        );
    }

    #[test]
    fn held_roads_cannot_be_edited_or_removed() {
        let mut ctl = controller(diamond_with_spurs(&test_config()));
        let d = ctl.simulate_emergency(id(1), id(4)).unwrap().unwrap();

        assert_eq!(
            ctl.edit_weight(id(2), id(3), 20),
            Err(ControlError::RoadInEmergency { a: id(2), b: id(3), handle: d.handle })
        );
        assert!(matches!(ctl.remove_road(id(5), id(2)), Err(ControlError::RoadInEmergency { .. })));
        assert!(matches!(ctl.remove_intersection(id(6)), Err(ControlError::RoadInEmergency { .. })));
        // The untouched bypass stays editable.
        ctl.edit_weight(id(1), id(4), 35).unwrap();

        ctl.restore(d.handle).unwrap();
        ctl.edit_weight(id(2), id(3), 20).unwrap();
        assert_eq!(base(&ctl, 2, 3), 20);
    }

    #[test]
    fn layout_load_waits_for_restore() {
        let config = test_config();
        let mut ctl = controller(diamond(&config));
        let d = ctl.simulate_emergency(id(1), id(4)).unwrap().unwrap();
        assert_eq!(
            ctl.load_layout(diamond_layout(&config.network)),
            Err(ControlError::EmergencyPending { pending: 1 })
        );
        ctl.restore(d.handle).unwrap();
        ctl.load_layout(diamond_layout(&config.network)).unwrap();
    }

    #[test]
    fn emergency_route_is_retained_while_pending() {
        let mut ctl = controller(diamond(&test_config()));
        let d = ctl.simulate_emergency(id(4), id(1)).unwrap().unwrap();
        assert_eq!(ctl.emergency_route(d.handle), Some(&d.route));
        assert_eq!(d.route.nodes, vec![id(4), id(3), id(2), id(1)]);
        let held = ctl.network().road_between(id(2), id(3)).unwrap();
        assert_eq!(ctl.held_by(held), Some(d.handle));
        ctl.restore(d.handle).unwrap();
        assert_eq!(ctl.emergency_route(d.handle), None);
        assert_eq!(ctl.held_by(held), None);
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::helpers::*;
    use tn_core::SimRng;
    use crate::EmergencyDispatch;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl TrafficObserver for Recorder {
        fn on_network_changed(&mut self, _network: &RoadNetwork) {
            self.events.push("changed".into());
        }
        fn on_congestion_refreshed(&mut self, _network: &RoadNetwork, roads: usize) {
            self.events.push(format!("refreshed {roads}"));
        }
        fn on_redistributed(&mut self, _network: &RoadNetwork, reset: usize) {
            self.events.push(format!("redistributed {reset}"));
        }
        fn on_emergency_dispatched(&mut self, _network: &RoadNetwork, d: &EmergencyDispatch) {
            self.events.push(format!("dispatched {}", d.handle.0));
        }
        fn on_emergency_restored(&mut self, _network: &RoadNetwork, h: EmergencyHandle, n: usize) {
            self.events.push(format!("restored {} {n}", h.0));
        }
    }

    #[test]
    fn every_completion_is_signalled() {
        let mut ctl = ControllerBuilder::new(test_config())
            .network(diamond(&test_config()))
            .observer(Recorder::default())
            .build()
            .unwrap();

        ctl.refresh_congestion(&mut SimRng::new(1));
        ctl.redistribute();
        let d = ctl.simulate_emergency(id(1), id(4)).unwrap().unwrap();
        ctl.restore(d.handle).unwrap();
        ctl.add_road(id(1), id(3), 10).unwrap();
        // Duplicate add changes nothing and is not signalled.
        ctl.add_road(id(3), id(1), 10).unwrap();

        let events = &ctl.observer().events;
        assert_eq!(events[0], "refreshed 4");
        assert!(events[1].starts_with("redistributed"));
        assert_eq!(events[2], "dispatched 0");
        assert_eq!(events[3], "restored 0 3");
        assert_eq!(events[4], "changed");
        assert_eq!(events.len(), 5);
    }
}

// ── Comparison view ───────────────────────────────────────────────────────────

#[cfg(test)]
mod compare_tests {
    use super::helpers::*;
    use tn_network::RoadKey;
    use crate::WeightTrend;

    #[test]
    fn trends_follow_live_weights() {
        let mut ctl = controller(diamond_with_spurs(&test_config()));
        let snap = ctl.capture_weights();
        assert_eq!(snap.len(), 6);
        assert_eq!(snap.weight(id(2), id(1)), Some(10));

        let d = ctl.simulate_emergency(id(1), id(4)).unwrap().unwrap();
        let trends = snap.compare(ctl.network());
        let trend = |a, b| {
            trends
                .iter()
                .find(|(k, _)| *k == RoadKey::new(id(a), id(b)))
                .map(|&(_, t)| t)
                .unwrap()
        };
        assert_eq!(trend(1, 2), WeightTrend::Decreased);
        assert_eq!(trend(2, 5), WeightTrend::Increased);
        assert_eq!(trend(1, 4), WeightTrend::Unchanged);

        ctl.restore(d.handle).unwrap();
        assert!(snap.compare(ctl.network()).iter().all(|&(_, t)| t == WeightTrend::Unchanged));
    }

    #[test]
    fn removed_and_added_roads_reported() {
        let mut ctl = controller(diamond(&test_config()));
        let snap = ctl.capture_weights();
        ctl.remove_road(id(1), id(4)).unwrap();
        ctl.add_road(id(1), id(3), 9).unwrap();
        let trends = snap.compare(ctl.network());
        assert!(trends.contains(&(RoadKey::new(id(1), id(4)), WeightTrend::Removed)));
        assert!(trends.contains(&(RoadKey::new(id(1), id(3)), WeightTrend::Added)));
        assert_eq!(trends.len(), 5);
        assert!(trends.windows(2).all(|w| w[0].0 < w[1].0));
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::helpers::*;
    use tn_core::SimRng;
    use tn_network::{GridShape, grid_layout};

    proptest! {
        #[test]
        fn restore_returns_exact_base_weights(
            seed in any::<u64>(),
            start in 1u32..=50,
            end in 1u32..=50,
            ticks in 0usize..4,
        ) {
            let config = TrafficConfig::with_seed(seed);
            let mut rng = SimRng::new(seed);
            let net = grid_layout(GridShape::CLASSIC, config.network.clone(), &mut rng)
                .build()
                .unwrap();
            let mut ctl = ControllerBuilder::new(config).network(net).build().unwrap();
            ctl.refresh_congestion(&mut rng);
            let before = base_weights(ctl.network());

            let d = ctl.simulate_emergency(id(start), id(end)).unwrap().unwrap();
            for _ in 0..ticks {
                ctl.refresh_congestion(&mut rng);
            }
            ctl.redistribute();
            prop_assert_eq!(ctl.restore(d.handle).unwrap(), d.path_roads + d.boundary_roads);
            prop_assert_eq!(base_weights(ctl.network()), before);
        }
    }
}
