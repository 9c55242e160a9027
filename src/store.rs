//! In-memory trip storage.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::StoreError;
use crate::traits::{TripStore, Versioned};
use crate::trip::{Trip, TripId};

/// Process-local store. Every committed write bumps the record's version.
#[derive(Debug, Default)]
pub struct InMemoryTripStore {
    trips: RwLock<HashMap<TripId, Versioned<Trip>>>,
}

impl InMemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.trips.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.read().is_empty()
    }
}

impl TripStore for InMemoryTripStore {
    fn get(&self, id: &TripId) -> Result<Versioned<Trip>, StoreError> {
        self.trips
            .read()
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound(*id))
    }

    fn insert(&self, trip: Trip) -> Result<Versioned<Trip>, StoreError> {
        let mut trips = self.trips.write();
        if trips.contains_key(&trip.id) {
            return Err(StoreError::AlreadyExists(trip.id));
        }

        let record = Versioned {
            value: trip,
            version: 1,
        };
        trips.insert(record.value.id, record.clone());
        Ok(record)
    }

    fn replace(
        &self,
        id: &TripId,
        trip: Trip,
        expected_version: u64,
    ) -> Result<Versioned<Trip>, StoreError> {
        let mut trips = self.trips.write();
        let current = trips.get_mut(id).ok_or(StoreError::NotFound(*id))?;

        if current.version != expected_version {
            return Err(StoreError::Conflict {
                id: *id,
                expected: expected_version,
                actual: current.version,
            });
        }

        *current = Versioned {
            value: Trip { id: *id, ..trip },
            version: expected_version + 1,
        };
        Ok(current.clone())
    }
}
