//! Trip progression: moves a planned trip forward one leg at a time.

use tracing::{info, warn};

use crate::error::TripError;
use crate::traits::{RideRequester, TripStore};
use crate::trip::{Leg, PLACEHOLDER_ETA, Trip, TripId, TripStatus};

#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// A ride was requested for the next leg; carries the updated trip.
    Advanced(Trip),
    /// The loop was already closed; carries the unchanged trip.
    Completed(Trip),
}

/// The leg the next advance would ride, or `None` once the loop is closed.
pub fn next_leg(trip: &Trip) -> Result<Option<Leg>, TripError> {
    if trip.is_completed() {
        return Ok(None);
    }

    let leg = match trip.next_location.as_ref() {
        None => {
            let first = trip.best_route.first().ok_or_else(|| TripError::CorruptTrip {
                id: trip.id,
                cursor: String::new(),
            })?;
            Leg {
                from: trip.start_location.clone(),
                to: first.clone(),
            }
        }
        Some(cursor) => {
            let index = trip
                .best_route
                .iter()
                .position(|stop| stop == cursor)
                .ok_or_else(|| TripError::CorruptTrip {
                    id: trip.id,
                    cursor: cursor.clone(),
                })?;
            let to = trip
                .best_route
                .get(index + 1)
                .unwrap_or(&trip.start_location)
                .clone();
            Leg {
                from: cursor.clone(),
                to,
            }
        }
    };

    Ok(Some(leg))
}

/// Applies the state transition for `leg` to a copy of the trip. The ETA is
/// left at the placeholder until the ride is actually booked.
fn transition(trip: &Trip, leg: &Leg) -> Trip {
    Trip {
        status: TripStatus::Requesting,
        next_location: Some(leg.to.clone()),
        eta: PLACEHOLDER_ETA,
        ..trip.clone()
    }
}

/// Advances the stored trip `id` by one leg.
///
/// The ride is booked before anything is written, so a failed booking leaves
/// the stored trip untouched. The write is a versioned replace against the
/// copy that was read.
pub fn advance<R, S>(store: &S, requester: &R, id: &TripId) -> Result<AdvanceOutcome, TripError>
where
    R: RideRequester + ?Sized,
    S: TripStore + ?Sized,
{
    let stored = store.get(id)?;
    let trip = stored.value;

    let Some(leg) = next_leg(&trip)? else {
        info!(trip = %trip.id, "trip already completed");
        return Ok(AdvanceOutcome::Completed(trip));
    };

    let mut updated = transition(&trip, &leg);

    let ticket = requester.request(&leg.from, &leg.to).map_err(|error| {
        warn!(trip = %trip.id, from = %leg.from, to = %leg.to, %error, "ride request failed");
        TripError::from(error)
    })?;
    updated.eta = ticket.eta;

    let committed = store.replace(id, updated, stored.version)?;

    info!(
        trip = %id,
        from = %leg.from,
        to = %leg.to,
        request = %ticket.request_id,
        eta = ticket.eta,
        "requested ride"
    );

    Ok(AdvanceOutcome::Advanced(committed.value))
}
