//! Fluent builder for constructing a [`TrafficController`].

use std::collections::BTreeMap;

use tn_core::TrafficConfig;
use tn_network::{CongestionModel, DijkstraPathFinder, PathFinder, RoadNetwork};

use crate::{ControlError, ControlResult, NoopObserver, TrafficController, TrafficObserver};

/// Fluent builder for [`TrafficController<P, O>`].
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                                   |
/// |--------------------|-------------------------------------------|
/// | `.network(n)`      | empty network using `config.network`      |
/// | `.path_finder(p)`  | [`DijkstraPathFinder`]                    |
/// | `.observer(o)`     | [`NoopObserver`]                          |
///
/// # Example
///
/// ```rust,ignore
/// let ctl = ControllerBuilder::new(TrafficConfig::default())
///     .network(network)
///     .observer(RedrawCounter::default())
///     .build()?;
/// ```
pub struct ControllerBuilder<P: PathFinder = DijkstraPathFinder, O: TrafficObserver = NoopObserver> {
    config:      TrafficConfig,
    network:     Option<RoadNetwork>,
    path_finder: P,
    observer:    O,
}

impl ControllerBuilder {
    pub fn new(config: TrafficConfig) -> Self {
        Self {
            config,
            network:     None,
            path_finder: DijkstraPathFinder,
            observer:    NoopObserver,
        }
    }
}

impl<P: PathFinder, O: TrafficObserver> ControllerBuilder<P, O> {
    /// Supply the starting network.  It must have been built with the same
    /// `NetworkConfig` as the controller.
    pub fn network(mut self, network: RoadNetwork) -> Self {
        self.network = Some(network);
        self
    }

    pub fn path_finder<Q: PathFinder>(self, path_finder: Q) -> ControllerBuilder<Q, O> {
        ControllerBuilder {
            config: self.config,
            network: self.network,
            path_finder,
            observer: self.observer,
        }
    }

    pub fn observer<T: TrafficObserver>(self, observer: T) -> ControllerBuilder<P, T> {
        ControllerBuilder {
            config: self.config,
            network: self.network,
            path_finder: self.path_finder,
            observer,
        }
    }

    /// Validate the configuration and return a ready controller.
    pub fn build(self) -> ControlResult<TrafficController<P, O>> {
        self.config.validate()?;

        let network = match self.network {
            Some(n) => {
                if n.config() != &self.config.network {
                    return Err(ControlError::NetworkConfigMismatch);
                }
                n
            }
            None => RoadNetwork::new(self.config.network.clone())?,
        };

        let congestion = CongestionModel::new(&self.config.congestion)?;

        Ok(TrafficController {
            congestion,
            config:      self.config,
            network,
            path_finder: self.path_finder,
            observer:    self.observer,
            pending:     BTreeMap::new(),
            next_handle: 0,
        })
    }
}
