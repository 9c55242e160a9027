//! Trip operations: create, read, advance.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::TripError;
use crate::planner::{self, PlanOptions};
use crate::progression::{self, AdvanceOutcome};
use crate::traits::{CostOracle, RideRequester, TripStore};
use crate::trip::{LocationId, Trip, TripId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTripRequest {
    #[serde(rename = "starting_from_location_id")]
    pub start_location: LocationId,
    #[serde(rename = "location_ids")]
    pub destinations: Vec<LocationId>,
}

pub struct TripService {
    oracle: Arc<dyn CostOracle>,
    requester: Arc<dyn RideRequester>,
    store: Arc<dyn TripStore>,
    options: PlanOptions,
    /// One lock per trip id; advances on the same trip run one at a time.
    advance_locks: Mutex<HashMap<TripId, Arc<Mutex<()>>>>,
}

impl TripService {
    pub fn new(
        oracle: Arc<dyn CostOracle>,
        requester: Arc<dyn RideRequester>,
        store: Arc<dyn TripStore>,
        options: PlanOptions,
    ) -> Self {
        Self {
            oracle,
            requester,
            store,
            options,
            advance_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Plans and stores a new trip. Nothing is stored if planning fails.
    pub fn create_trip(&self, request: CreateTripRequest) -> Result<Trip, TripError> {
        let plan = planner::plan_route(
            self.oracle.as_ref(),
            &request.start_location,
            &request.destinations,
            &self.options,
        )?;
        let trip = Trip::planned(request.start_location, plan);
        let stored = self.store.insert(trip)?;

        info!(trip = %stored.value.id, "created trip");
        Ok(stored.value)
    }

    /// Read projection of a stored trip.
    pub fn read_trip(&self, raw_id: &str) -> Result<Trip, TripError> {
        let id = parse_id(raw_id)?;
        let stored = self.store.get(&id)?;
        Ok(stored.value.snapshot())
    }

    pub fn advance_trip(&self, raw_id: &str) -> Result<AdvanceOutcome, TripError> {
        let id = parse_id(raw_id)?;
        // Unknown ids never get a lock entry.
        self.store.get(&id)?;

        let lock = self.advance_lock(id);
        let outcome = {
            let _guard = lock.lock();
            progression::advance(self.store.as_ref(), self.requester.as_ref(), &id)
        };
        self.release_advance_lock(&id, lock);

        outcome
    }

    fn advance_lock(&self, id: TripId) -> Arc<Mutex<()>> {
        self.advance_locks.lock().entry(id).or_default().clone()
    }

    /// Drops the entry for `id` once no other advance holds or waits on it.
    /// Handles are only cloned under the map lock, so the count is stable here.
    fn release_advance_lock(&self, id: &TripId, lock: Arc<Mutex<()>>) {
        let mut locks = self.advance_locks.lock();
        if Arc::strong_count(&lock) == 2 {
            locks.remove(id);
        }
    }
}

fn parse_id(raw_id: &str) -> Result<TripId, TripError> {
    TripId::parse(raw_id).ok_or_else(|| TripError::NotFound(raw_id.to_string()))
}
