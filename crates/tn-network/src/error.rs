//! Network-subsystem error type.

use thiserror::Error;

use tn_core::{CoreError, IntersectionId, RoadId};

/// Errors produced by `tn-network`.
///
/// An unreachable destination is not an error: routing returns an empty
/// [`Route`](crate::Route) instead.
#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("base weight {weight} outside [{min}, {max}]")]
    InvalidWeight { weight: u32, min: u32, max: u32 },

    #[error("intersection {0} not found in network")]
    UnknownNode(IntersectionId),

    #[error("no road between {a} and {b}")]
    NoSuchRoad { a: IntersectionId, b: IntersectionId },

    #[error("road from {0} to itself")]
    SelfLoop(IntersectionId),

    #[error("road slot {0} is vacant")]
    VacantRoad(RoadId),

    #[error("congestion factor {0} is below 1.0")]
    InvalidFactor(f64),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
