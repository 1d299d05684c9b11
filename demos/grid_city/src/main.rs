//! grid_city: headless driver for the traffic network engine.
//!
//! Builds the 5 × 10 grid city, then plays the part of the UI: a fixed
//! number of congestion ticks (the UI refreshes every 20 s), a corner-to-
//! corner route query, one emergency dispatch restored a few ticks later,
//! a redistribution, and a before/after comparison.
//!
//! Set `RUST_LOG=debug` to see per-operation detail from the engine.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tn_control::{ControllerBuilder, EmergencyDispatch, TrafficObserver, WeightTrend};
use tn_core::{EmergencyHandle, SimRng, TrafficConfig};
use tn_network::{GridShape, RoadNetwork, grid_layout};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                u64   = 42;
const WARMUP_TICKS:        usize = 3;
/// Ticks the emergency vehicle needs to cross the city.
const EMERGENCY_TICKS:     usize = 2;

// ── Observer: counts redraws the UI would have done ───────────────────────────

#[derive(Default)]
struct RedrawCounter {
    redraws: usize,
}

impl TrafficObserver for RedrawCounter {
    fn on_network_changed(&mut self, _network: &RoadNetwork) {
        self.redraws += 1;
    }

    fn on_congestion_refreshed(&mut self, _network: &RoadNetwork, roads: usize) {
        self.redraws += 1;
        info!(roads, "traffic conditions updated");
    }

    fn on_redistributed(&mut self, _network: &RoadNetwork, reset: usize) {
        self.redraws += 1;
        info!(reset, "heavy congestion eased");
    }

    fn on_emergency_dispatched(&mut self, _network: &RoadNetwork, d: &EmergencyDispatch) {
        self.redraws += 1;
        info!(handle = d.handle.0, hops = d.route.nodes.len().saturating_sub(1), "ambulance en route");
    }

    fn on_emergency_restored(&mut self, _network: &RoadNetwork, handle: EmergencyHandle, restored: usize) {
        self.redraws += 1;
        info!(handle = handle.0, restored, "ambulance arrived; weights restored");
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = TrafficConfig::with_seed(SEED);
    let mut rng = SimRng::new(config.seed);
    let mut layout_rng = rng.child(1);

    let shape = GridShape::CLASSIC;
    let network = grid_layout(shape, config.network.clone(), &mut layout_rng)
        .build()
        .context("building grid city")?;

    let mut ctl = ControllerBuilder::new(config)
        .network(network)
        .observer(RedrawCounter::default())
        .build()
        .context("building controller")?;

    let start = shape.id_at(0, 0);
    let end = shape.id_at(shape.rows - 1, shape.cols - 1);

    // ── Warm-up: congestion ticks ─────────────────────────────────────────
    for _ in 0..WARMUP_TICKS {
        ctl.refresh_congestion(&mut rng);
    }
    let baseline = ctl.capture_weights();

    // ── Route query ───────────────────────────────────────────────────────
    let route = ctl.shortest_path(start, end)?;
    for (from, to, weight) in route.leg_weights(ctl.network()) {
        info!(from = from.0, to = to.0, live_weight = ?weight, "leg");
    }
    info!(total_travel_time = route.total_cost, hops = route.legs().count(), "shortest path");

    // ── Emergency: dispatch, let time pass, restore ───────────────────────
    if let Some(dispatch) = ctl.simulate_emergency(start, end)? {
        let during = ctl.shortest_path(start, end)?;
        info!(total_travel_time = during.total_cost, "shortest path during emergency");
        for _ in 0..EMERGENCY_TICKS {
            ctl.refresh_congestion(&mut rng);
        }
        ctl.restore(dispatch.handle)?;
    }

    // ── Load shedding and comparison ──────────────────────────────────────
    ctl.redistribute();

    let trends = baseline.compare(ctl.network());
    let count = |t: WeightTrend| trends.iter().filter(|&&(_, x)| x == t).count();
    info!(
        slower = count(WeightTrend::Increased),
        faster = count(WeightTrend::Decreased),
        unchanged = count(WeightTrend::Unchanged),
        "compared with warm-up snapshot"
    );
    info!(redraws = ctl.observer().redraws, "done");
    Ok(())
}
