//! `tn-network`: road network, congestion, and routing.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`road`]       | `Road`, `RoadKey`                                         |
//! | [`network`]    | `RoadNetwork` (road arena + adjacency), `RoadNetworkBuilder` |
//! | [`layout`]     | `grid_layout`, `GridShape`                                |
//! | [`congestion`] | `CongestionModel` (refresh, redistribution)               |
//! | [`router`]     | `PathFinder` trait, `Route`, `DijkstraPathFinder`         |
//! | [`error`]      | `NetworkError`, `NetworkResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for Dijkstra's per-query maps.   |
//! | `serde`   | Derives `Serialize`/`Deserialize` on public types.         |
//!
//! # Concurrency
//!
//! Nothing here locks.  Queries take `&RoadNetwork` and may run side by side;
//! mutations take `&mut RoadNetwork`, so the borrow checker already enforces
//! the single-writer rule within one thread.  Callers sharing a network
//! across threads wrap it in their own `Mutex`/`RwLock`.

pub mod congestion;
pub mod error;
pub mod layout;
pub mod network;
pub mod road;
pub mod router;


pub use congestion::CongestionModel;
pub use error::{NetworkError, NetworkResult};
pub use layout::{GridShape, grid_layout};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use road::{Road, RoadKey};
pub use router::{DijkstraPathFinder, PathFinder, Route};
