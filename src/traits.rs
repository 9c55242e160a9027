//! Collaborator seams for the trip planner.
//!
//! The planner and the progression controller only talk to the outside world
//! through these traits. Concrete adapters (ride-hailing HTTP API, offline
//! haversine estimates, in-memory storage) live in their own modules.

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, UpstreamError};
use crate::trip::{Trip, TripId};

/// Geographic position of a location (WGS84 degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Estimate for a single directed leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegCost {
    /// Price in whole currency units, as quoted by the oracle.
    pub cost: i64,
    /// Ride duration in seconds.
    pub duration: i64,
    /// Ride distance in miles.
    pub distance: f64,
}

/// Result of booking a ride for one leg.
#[derive(Debug, Clone, PartialEq)]
pub struct RideTicket {
    pub request_id: String,
    pub status: String,
    /// Minutes until pickup.
    pub eta: i64,
}

/// Prices a leg between two locations.
pub trait CostOracle: Send + Sync {
    fn estimate(&self, from: &str, to: &str) -> Result<LegCost, UpstreamError>;
}

/// Books an actual ride for a leg.
pub trait RideRequester: Send + Sync {
    fn request(&self, from: &str, to: &str) -> Result<RideTicket, UpstreamError>;
}

/// Resolves location identifiers to coordinates.
pub trait LocationDirectory: Send + Sync {
    fn resolve(&self, id: &str) -> Result<Coordinate, UpstreamError>;
}

/// A stored value together with the version it was committed at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

/// Keyed storage for trip records.
///
/// `replace` is an optimistic write: it only succeeds when the record is
/// still at `expected_version`, so a writer that read a stale copy cannot
/// clobber a newer one.
pub trait TripStore: Send + Sync {
    fn get(&self, id: &TripId) -> Result<Versioned<Trip>, StoreError>;

    fn insert(&self, trip: Trip) -> Result<Versioned<Trip>, StoreError>;

    fn replace(
        &self,
        id: &TripId,
        trip: Trip,
        expected_version: u64,
    ) -> Result<Versioned<Trip>, StoreError>;
}

