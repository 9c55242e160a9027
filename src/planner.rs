//! Greedy route planner.
//!
//! Starting from the origin, repeatedly hops to the cheapest remaining
//! destination (by quoted ride cost) until every destination is visited, then
//! closes the loop back to the origin.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{TripError, UpstreamError};
use crate::traits::{CostOracle, LegCost};
use crate::trip::LocationId;

#[derive(Debug, Clone)]
pub struct PlanOptions {
    /// Price the candidate legs of each hop concurrently on the rayon pool.
    pub parallel: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Visiting order and closed-loop totals.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    /// Destinations in visiting order, origin excluded.
    pub route: Vec<LocationId>,
    pub total_cost: i64,
    /// Seconds.
    pub total_duration: i64,
    /// Miles, rounded up to a whole mile.
    pub total_distance: f64,
}

/// Checks the planner's preconditions on a request.
pub fn validate_destinations(start: &str, destinations: &[LocationId]) -> Result<(), TripError> {
    if start.trim().is_empty() {
        return Err(TripError::Validation(
            "starting location must not be empty".to_string(),
        ));
    }
    if destinations.is_empty() {
        return Err(TripError::Validation(
            "at least one destination is required".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(destinations.len());
    for destination in destinations {
        if destination.trim().is_empty() {
            return Err(TripError::Validation(
                "destination ids must not be empty".to_string(),
            ));
        }
        if destination == start {
            return Err(TripError::Validation(format!(
                "destination {} is the starting location",
                destination
            )));
        }
        if !seen.insert(destination.as_str()) {
            return Err(TripError::Validation(format!(
                "destination {} listed more than once",
                destination
            )));
        }
    }

    Ok(())
}

pub fn plan_route<O>(
    oracle: &O,
    start: &str,
    destinations: &[LocationId],
    options: &PlanOptions,
) -> Result<RoutePlan, TripError>
where
    O: CostOracle + ?Sized,
{
    validate_destinations(start, destinations)?;

    let mut remaining: Vec<LocationId> = destinations.to_vec();
    let mut route = Vec::with_capacity(destinations.len());
    let mut current = start.to_string();
    let mut total_cost = 0;
    let mut total_duration = 0;
    let mut total_distance = 0.0;

    while !remaining.is_empty() {
        let legs = price_candidates(oracle, &current, &remaining, options.parallel)?;
        let best = cheapest(&legs);
        let leg = legs[best];

        // Vec::remove keeps the enumeration order stable for the next tie-break.
        let next = remaining.remove(best);
        debug!(from = %current, to = %next, cost = leg.cost, "selected leg");

        total_cost += leg.cost;
        total_duration += leg.duration;
        total_distance += leg.distance;

        route.push(next.clone());
        current = next;
    }

    let closing = estimate_leg(oracle, &current, start)?;
    total_cost += closing.cost;
    total_duration += closing.duration;
    total_distance += closing.distance;

    let plan = RoutePlan {
        route,
        total_cost,
        total_duration,
        total_distance: total_distance.ceil(),
    };

    info!(
        start,
        stops = plan.route.len(),
        total_cost = plan.total_cost,
        total_duration = plan.total_duration,
        total_distance = plan.total_distance,
        "planned route"
    );

    Ok(plan)
}

/// Prices `current -> candidate` for every candidate, in candidate order.
fn price_candidates<O>(
    oracle: &O,
    current: &str,
    candidates: &[LocationId],
    parallel: bool,
) -> Result<Vec<LegCost>, UpstreamError>
where
    O: CostOracle + ?Sized,
{
    if parallel {
        candidates
            .par_iter()
            .map(|to| estimate_leg(oracle, current, to))
            .collect()
    } else {
        candidates
            .iter()
            .map(|to| estimate_leg(oracle, current, to))
            .collect()
    }
}

fn estimate_leg<O>(oracle: &O, from: &str, to: &str) -> Result<LegCost, UpstreamError>
where
    O: CostOracle + ?Sized,
{
    let leg = oracle.estimate(from, to)?;

    let malformed = leg.cost < 0
        || leg.duration < 0
        || !leg.distance.is_finite()
        || leg.distance < 0.0;
    let empty = from != to && leg.cost == 0 && leg.duration == 0 && leg.distance == 0.0;

    if malformed || empty {
        return Err(UpstreamError::Degraded {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    Ok(leg)
}

/// Index of the strictly cheapest leg; the earliest wins ties.
fn cheapest(legs: &[LegCost]) -> usize {
    let mut best = 0;
    for (index, leg) in legs.iter().enumerate().skip(1) {
        if leg.cost < legs[best].cost {
            best = index;
        }
    }
    best
}
