//! The single owned record behind each undirected road.
//!
//! Both endpoints of a road refer to the same [`Road`] through its
//! [`RoadId`](tn_core::RoadId), so there is exactly one `base_weight` and one
//! `congestion_factor` per road and the two directions can never disagree.

use tn_core::IntersectionId;

// ── RoadKey ───────────────────────────────────────────────────────────────────

/// Unordered intersection pair, normalised so that `lo < hi`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadKey {
    pub lo: IntersectionId,
    pub hi: IntersectionId,
}

impl RoadKey {
    pub fn new(a: IntersectionId, b: IntersectionId) -> Self {
        if a <= b { Self { lo: a, hi: b } } else { Self { lo: b, hi: a } }
    }
}

// ── Road ──────────────────────────────────────────────────────────────────────

/// An undirected road.
///
/// Fields are private: mutation goes through [`RoadNetwork`] or
/// [`CongestionModel`], which keep the weight rules in one place.
///
/// [`RoadNetwork`]: crate::RoadNetwork
/// [`CongestionModel`]: crate::CongestionModel
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Road {
    key:               RoadKey,
    base_weight:       u32,
    congestion_factor: f64,
}

impl Road {
    pub(crate) fn new(key: RoadKey, base_weight: u32) -> Self {
        Self { key, base_weight, congestion_factor: 1.0 }
    }

    #[inline]
    pub fn key(&self) -> RoadKey {
        self.key
    }

    #[inline]
    pub fn endpoints(&self) -> (IntersectionId, IntersectionId) {
        (self.key.lo, self.key.hi)
    }

    /// The endpoint opposite `from`, or `None` if `from` is not an endpoint.
    #[inline]
    pub fn other(&self, from: IntersectionId) -> Option<IntersectionId> {
        if from == self.key.lo {
            Some(self.key.hi)
        } else if from == self.key.hi {
            Some(self.key.lo)
        } else {
            None
        }
    }

    /// Travel time at zero congestion.
    #[inline]
    pub fn base_weight(&self) -> u32 {
        self.base_weight
    }

    /// Multiplier applied to the base weight; always ≥ 1.0.
    #[inline]
    pub fn congestion_factor(&self) -> f64 {
        self.congestion_factor
    }

    /// `floor(base_weight * congestion_factor)`.  Never below `base_weight`.
    #[inline]
    pub fn live_weight(&self) -> u32 {
        (self.base_weight as f64 * self.congestion_factor).floor() as u32
    }

    #[inline]
    pub(crate) fn set_base_weight(&mut self, weight: u32) {
        self.base_weight = weight;
    }

    #[inline]
    pub(crate) fn set_congestion_factor(&mut self, factor: f64) {
        debug_assert!(factor >= 1.0, "congestion factor {factor} below 1.0");
        self.congestion_factor = factor;
    }
}
