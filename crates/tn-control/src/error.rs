use thiserror::Error;

use tn_core::{CoreError, EmergencyHandle, IntersectionId, RoadId};
use tn_network::NetworkError;

#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("network was built with different weight rules than the controller configuration")]
    NetworkConfigMismatch,

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("road {road} is already perturbed by pending {active}")]
    EmergencyOverlap { road: RoadId, active: EmergencyHandle },

    #[error("{0} is not a pending emergency")]
    UnknownEmergency(EmergencyHandle),

    #[error("road between {a} and {b} is held by pending {handle}")]
    RoadInEmergency { a: IntersectionId, b: IntersectionId, handle: EmergencyHandle },

    #[error("{pending} emergencies still pending; restore them first")]
    EmergencyPending { pending: usize },
}

pub type ControlResult<T> = Result<T, ControlError>;
