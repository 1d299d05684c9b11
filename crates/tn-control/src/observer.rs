//! Completion callbacks for the presentation layer.

use tn_core::EmergencyHandle;
use tn_network::RoadNetwork;

use crate::EmergencyDispatch;

/// Callbacks invoked by [`TrafficController`](crate::TrafficController)
/// after each state change, typically used to trigger a redraw.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: redraw counter
///
/// ```rust,ignore
/// struct Redraws(usize);
///
/// impl TrafficObserver for Redraws {
///     fn on_congestion_refreshed(&mut self, _net: &RoadNetwork, _roads: usize) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait TrafficObserver {
    /// Intersections or roads were added, removed, edited, or a whole layout
    /// was loaded.
    fn on_network_changed(&mut self, _network: &RoadNetwork) {}

    /// A congestion refresh touched `roads` roads.
    fn on_congestion_refreshed(&mut self, _network: &RoadNetwork, _roads: usize) {}

    /// Redistribution reset `reset` roads to free flow.
    fn on_redistributed(&mut self, _network: &RoadNetwork, _reset: usize) {}

    /// An emergency episode started and its weights are now perturbed.
    fn on_emergency_dispatched(&mut self, _network: &RoadNetwork, _dispatch: &EmergencyDispatch) {}

    /// An emergency episode ended; `restored` roads got their base weight back.
    fn on_emergency_restored(&mut self, _network: &RoadNetwork, _handle: EmergencyHandle, _restored: usize) {}
}

/// A [`TrafficObserver`] that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl TrafficObserver for NoopObserver {}
