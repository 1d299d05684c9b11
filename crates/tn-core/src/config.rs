//! Engine configuration.
//!
//! Typically built in code by the application (or deserialized with the
//! `serde` feature) and handed to the network builder and the controller.
//! All defaults reproduce the classic behaviour: base weights in `[5, 30]`,
//! congestion factors drawn from `[1.0, 2.5)`, redistribution above a live
//! weight of 20, and emergency perturbations of −10 / +5.

use crate::{CoreError, CoreResult};

// ── NetworkConfig ─────────────────────────────────────────────────────────────

/// Validation rules for road construction and edits.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    /// Inclusive lower bound for a user-supplied base weight.
    pub min_base_weight: u32,

    /// Inclusive upper bound for a user-supplied base weight.
    pub max_base_weight: u32,

    /// When `true`, `add_road` creates missing endpoints instead of failing
    /// with `UnknownNode`.
    pub auto_create_intersections: bool,
}

impl NetworkConfig {
    /// `true` if `weight` lies within `[min_base_weight, max_base_weight]`.
    #[inline]
    pub fn weight_in_bounds(&self, weight: u32) -> bool {
        (self.min_base_weight..=self.max_base_weight).contains(&weight)
    }

    /// Bounds must be non-empty and start above zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.min_base_weight == 0 || self.min_base_weight > self.max_base_weight {
            return Err(CoreError::WeightBounds {
                min: self.min_base_weight,
                max: self.max_base_weight,
            });
        }
        Ok(())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            min_base_weight:           5,
            max_base_weight:           30,
            auto_create_intersections: false,
        }
    }
}

// ── CongestionConfig ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CongestionConfig {
    /// Inclusive lower end of the refresh draw.  Must be ≥ 1.0.
    pub min_factor: f64,

    /// Exclusive upper end of the refresh draw.
    pub max_factor: f64,

    /// Roads whose live weight is strictly above this are reset by
    /// redistribution.
    pub redistribute_threshold: u32,
}

impl CongestionConfig {
    /// The draw range must be non-empty and start at or above 1.0, so a
    /// refreshed road never gets faster than its base weight.
    pub fn validate(&self) -> CoreResult<()> {
        // Negated comparisons also reject NaN.
        if !(self.min_factor >= 1.0) || !(self.max_factor > self.min_factor) {
            return Err(CoreError::FactorRange { min: self.min_factor, max: self.max_factor });
        }
        Ok(())
    }
}

impl Default for CongestionConfig {
    fn default() -> Self {
        Self {
            min_factor:             1.0,
            max_factor:             2.5,
            redistribute_threshold: 20,
        }
    }
}

// ── EmergencyConfig ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmergencyConfig {
    /// Subtracted from each path road's base weight, clamped to
    /// `NetworkConfig::min_base_weight`.
    pub path_reduction: u32,

    /// Added to each boundary road's base weight.  Not clamped: the
    /// perturbation is transient and undone by restore.
    pub boundary_increase: u32,
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self { path_reduction: 10, boundary_increase: 5 }
    }
}

// ── TrafficConfig ─────────────────────────────────────────────────────────────

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrafficConfig {
    pub network:    NetworkConfig,
    pub congestion: CongestionConfig,
    pub emergency:  EmergencyConfig,

    /// Master RNG seed used by applications to build their [`SimRng`].
    /// The engine itself never seeds anything.
    ///
    /// [`SimRng`]: crate::SimRng
    pub seed: u64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            network:    NetworkConfig::default(),
            congestion: CongestionConfig::default(),
            emergency:  EmergencyConfig::default(),
            seed:       42,
        }
    }
}

impl TrafficConfig {
    /// Default configuration with an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }

    /// Reject settings the engine cannot honour.
    pub fn validate(&self) -> CoreResult<()> {
        self.network.validate()?;
        self.congestion.validate()
    }
}
