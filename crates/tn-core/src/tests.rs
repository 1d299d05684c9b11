//! Unit tests for tn-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EmergencyHandle, IntersectionId, RoadId};

    #[test]
    fn ordering() {
        assert!(IntersectionId(1) < IntersectionId(2));
        assert!(RoadId(100) > RoadId(99));
    }

    #[test]
    fn road_index() {
        assert_eq!(RoadId(7).index(), 7);
    }

    #[test]
    fn display() {
        assert_eq!(IntersectionId(7).to_string(), "IntersectionId(7)");
        assert_eq!(EmergencyHandle(3).to_string(), "EmergencyHandle(3)");
    }

    #[test]
    fn from_raw() {
        assert_eq!(IntersectionId::from(12u32), IntersectionId(12));
        assert_eq!(IntersectionId(12).get(), 12);
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, TrafficConfig};

    #[test]
    fn defaults_match_classic_rules() {
        let c = TrafficConfig::default();
        assert_eq!(c.network.min_base_weight, 5);
        assert_eq!(c.network.max_base_weight, 30);
        assert!(!c.network.auto_create_intersections);
        assert_eq!(c.congestion.min_factor, 1.0);
        assert_eq!(c.congestion.max_factor, 2.5);
        assert_eq!(c.congestion.redistribute_threshold, 20);
        assert_eq!(c.emergency.path_reduction, 10);
        assert_eq!(c.emergency.boundary_increase, 5);
        assert_eq!(c.seed, 42);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn weight_bounds_inclusive() {
        let n = TrafficConfig::default().network;
        assert!(!n.weight_in_bounds(4));
        assert!(n.weight_in_bounds(5));
        assert!(n.weight_in_bounds(30));
        assert!(!n.weight_in_bounds(31));
    }

    #[test]
    fn rejects_inverted_weight_bounds() {
        let mut c = TrafficConfig::default();
        c.network.min_base_weight = 40;
        assert_eq!(c.validate(), Err(CoreError::WeightBounds { min: 40, max: 30 }));
    }

    #[test]
    fn rejects_zero_min_weight() {
        let mut c = TrafficConfig::default();
        c.network.min_base_weight = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn rejects_factor_below_one() {
        let mut c = TrafficConfig::default();
        c.congestion.min_factor = 0.5;
        assert!(matches!(c.validate(), Err(CoreError::FactorRange { .. })));
    }

    #[test]
    fn rejects_empty_factor_range() {
        let mut c = TrafficConfig::default();
        c.congestion.max_factor = 1.0;
        assert!(c.validate().is_err());
        c.congestion.max_factor = f64::NAN;
        assert!(c.validate().is_err());
    }

    #[test]
    fn section_validation_matches_top_level() {
        let mut c = TrafficConfig::default();
        c.congestion.min_factor = 2.0;
        c.congestion.max_factor = 2.0;
        assert_eq!(c.congestion.validate(), c.validate());
        assert!(c.congestion.validate().is_err());

        let mut c = TrafficConfig::default();
        c.network.max_base_weight = 4;
        assert_eq!(c.network.validate(), Err(CoreError::WeightBounds { min: 5, max: 4 }));
        assert!(c.congestion.validate().is_ok());
    }

    #[test]
    fn with_seed_keeps_defaults() {
        let c = TrafficConfig::with_seed(7);
        assert_eq!(c.seed, 7);
        assert_eq!(c.network, TrafficConfig::default().network);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(99);
        let mut b = SimRng::new(99);
        for _ in 0..16 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SimRng::new(1);
        let mut b = SimRng::new(2);
        let xs: Vec<u64> = (0..4).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..4).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn gen_range_respects_bounds() {
        let mut r = SimRng::new(5);
        for _ in 0..1_000 {
            let f: f64 = r.gen_range(1.0..2.5);
            assert!((1.0..2.5).contains(&f));
        }
    }

    #[test]
    fn child_is_deterministic() {
        let mut a = SimRng::new(3);
        let mut b = SimRng::new(3);
        let mut ca = a.child(1);
        let mut cb = b.child(1);
        assert_eq!(ca.random::<u32>(), cb.random::<u32>());
    }
}
