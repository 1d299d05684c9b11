//! `tn-core`: foundational types for the traffic network engine.
//!
//! This crate is a dependency of every other `tn-*` crate.  It has no `tn-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`ids`]    | `IntersectionId`, `RoadId`, `EmergencyHandle`                |
//! | [`config`] | `TrafficConfig` and its `network`/`congestion`/`emergency` sections |
//! | [`rng`]    | `SimRng` (caller-owned, seedable)                            |
//! | [`error`]  | `CoreError`, `CoreResult`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and configuration.   |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{CongestionConfig, EmergencyConfig, NetworkConfig, TrafficConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{EmergencyHandle, IntersectionId, RoadId};
pub use rng::SimRng;
