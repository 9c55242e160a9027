//! Error taxonomy shared by the planner, the controller and the service.

use thiserror::Error;

use crate::trip::TripId;

/// Failure of an external collaborator (pricing, ride booking, directory).
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("unknown location {0}")]
    UnknownLocation(String),

    #[error("no ride product available near {0}")]
    NoProduct(String),

    #[error("no price estimate for product {0}")]
    MissingEstimate(String),

    #[error("ride request {0} returned no ETA")]
    MissingEta(String),

    #[error("degraded estimate for leg {from} -> {to}")]
    Degraded { from: String, to: String },

    #[error("{0}")]
    Unavailable(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("trip {0} not found")]
    NotFound(TripId),

    #[error("trip {0} already exists")]
    AlreadyExists(TripId),

    #[error("trip {id} was modified concurrently (expected version {expected}, found {actual})")]
    Conflict {
        id: TripId,
        expected: u64,
        actual: u64,
    },
}

/// Errors surfaced by trip operations.
#[derive(Debug, Error)]
pub enum TripError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("trip {0} not found")]
    NotFound(String),

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(UpstreamError),

    #[error("trip {0} was modified concurrently")]
    Conflict(TripId),

    #[error("trip {id} has cursor {cursor} outside its planned route")]
    CorruptTrip { id: TripId, cursor: String },
}

impl From<UpstreamError> for TripError {
    fn from(error: UpstreamError) -> Self {
        match error {
            UpstreamError::UnknownLocation(id) => {
                TripError::Validation(format!("unknown location {}", id))
            }
            other => TripError::UpstreamUnavailable(other),
        }
    }
}

impl From<StoreError> for TripError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => TripError::NotFound(id.to_string()),
            StoreError::AlreadyExists(id) | StoreError::Conflict { id, .. } => {
                TripError::Conflict(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_location_is_a_validation_error() {
        let error: TripError = UpstreamError::UnknownLocation("nowhere".to_string()).into();
        assert!(matches!(error, TripError::Validation(message) if message.contains("nowhere")));
    }

    #[test]
    fn other_upstream_failures_are_unavailable() {
        let error: TripError = UpstreamError::NoProduct("S".to_string()).into();
        assert!(matches!(error, TripError::UpstreamUnavailable(_)));
    }

    #[test]
    fn store_conflict_maps_to_trip_conflict() {
        let id = TripId::new();
        let error: TripError = StoreError::Conflict {
            id,
            expected: 1,
            actual: 2,
        }
        .into();
        assert!(matches!(error, TripError::Conflict(conflicted) if conflicted == id));
    }
}
