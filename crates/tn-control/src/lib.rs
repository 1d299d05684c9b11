//! `tn-control`: orchestration layer for the traffic network engine.
//!
//! # Operation surface
//!
//! ```text
//! presentation ──▶ TrafficController ──▶ RoadNetwork (writes)
//!                        │
//!                        ├──▶ CongestionModel  refresh / redistribute
//!                        └──▶ PathFinder       shortest_path (reads)
//! ```
//!
//! # Emergency episodes
//!
//! ```text
//! Idle ─simulate_emergency─▶ PathComputed ─perturb─▶ Perturbed ─restore(handle)─▶ Idle
//! ```
//!
//! `simulate_emergency` computes the route, snapshots every road it is about
//! to touch, lowers the route's roads and raises the boundary roads, then
//! hands back an [`EmergencyHandle`](tn_core::EmergencyHandle).  Nothing is
//! timed here: whoever drives the engine (a UI timer, a test) calls
//! [`TrafficController::restore`] when the episode is over.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tn_control::ControllerBuilder;
//! use tn_core::{SimRng, TrafficConfig};
//!
//! let config = TrafficConfig::default();
//! let mut rng = SimRng::new(config.seed);
//! let mut ctl = ControllerBuilder::new(config).network(network).build()?;
//! ctl.refresh_congestion(&mut rng);
//! if let Some(dispatch) = ctl.simulate_emergency(start, end)? {
//!     // ... animate dispatch.route ...
//!     ctl.restore(dispatch.handle)?;
//! }
//! ```

pub mod builder;
pub mod compare;
pub mod controller;
pub mod emergency;
pub mod error;
pub mod observer;

#[cfg(test)]
mod tests;

pub use builder::ControllerBuilder;
pub use compare::{WeightSnapshot, WeightTrend};
pub use controller::TrafficController;
pub use emergency::EmergencyDispatch;
pub use error::{ControlError, ControlResult};
pub use observer::{NoopObserver, TrafficObserver};
