//! The persisted trip record.
//!
//! Field names on the wire follow the ride-hailing vocabulary clients already
//! consume (`total_uber_costs`, `uber_wait_time_eta`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::planner::RoutePlan;

pub type LocationId = String;

/// ETA reported while the real estimate for a leg is still pending.
pub const PLACEHOLDER_ETA: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(Uuid);

impl TripId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a client supplied identifier. Returns `None` when malformed.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for TripId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored lifecycle status. Completion is not stored: a trip is complete once
/// its cursor is back at the start location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripStatus {
    Planning,
    Requesting,
}

/// A directed ride segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    pub from: LocationId,
    pub to: LocationId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub status: TripStatus,
    #[serde(rename = "starting_from_location_id")]
    pub start_location: LocationId,
    /// Destination of the leg in progress, unset until the first advance.
    #[serde(
        rename = "next_destination_location_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_location: Option<LocationId>,
    #[serde(rename = "best_route_location_ids")]
    pub best_route: Vec<LocationId>,
    #[serde(rename = "total_uber_costs")]
    pub total_cost: i64,
    #[serde(rename = "total_uber_duration")]
    pub total_duration: i64,
    pub total_distance: f64,
    /// Minutes until pickup for the current leg.
    #[serde(rename = "uber_wait_time_eta", default, skip_serializing_if = "is_zero")]
    pub eta: i64,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl Trip {
    /// A freshly planned trip, not yet started.
    pub fn planned(start_location: LocationId, plan: RoutePlan) -> Self {
        Self {
            id: TripId::new(),
            status: TripStatus::Planning,
            start_location,
            next_location: None,
            best_route: plan.route,
            total_cost: plan.total_cost,
            total_duration: plan.total_duration,
            total_distance: plan.total_distance,
            eta: 0,
        }
    }

    /// The loop is closed once the cursor has returned to the start.
    pub fn is_completed(&self) -> bool {
        self.next_location.as_deref() == Some(self.start_location.as_str())
    }

    /// Client-facing view for passive reads: the current leg and its ETA are
    /// never exposed here.
    pub fn snapshot(&self) -> Trip {
        Trip {
            next_location: None,
            eta: 0,
            ..self.clone()
        }
    }
}
