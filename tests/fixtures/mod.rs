//! Test fixtures for trip-planner.
//!
//! Provides scripted collaborators:
//! - `TableOracle`: leg quotes from a lookup table, with a call log
//! - `ScriptedRequester`: ride bookings with configurable ETA, delay and failure

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use trip_planner::error::UpstreamError;
use trip_planner::traits::{CostOracle, LegCost, RideRequester, RideTicket};

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Quotes legs from a table. Unknown legs fail like an unreachable upstream.
#[derive(Default)]
pub struct TableOracle {
    legs: HashMap<(String, String), LegCost>,
    calls: Mutex<Vec<(String, String)>>,
}

impl TableOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leg(mut self, from: &str, to: &str, cost: i64, duration: i64, distance: f64) -> Self {
        self.legs.insert(
            (from.to_string(), to.to_string()),
            LegCost {
                cost,
                duration,
                distance,
            },
        );
        self
    }

    /// Same leg in both directions.
    pub fn both_ways(self, a: &str, b: &str, cost: i64, duration: i64, distance: f64) -> Self {
        self.leg(a, b, cost, duration, distance)
            .leg(b, a, cost, duration, distance)
    }

    /// Fully connected table over `locations` with deterministic, scattered
    /// costs derived from the location names.
    pub fn scattered(locations: &[String]) -> Self {
        let mut oracle = Self::new();
        for from in locations {
            for to in locations {
                if from == to {
                    continue;
                }
                let seed = from
                    .bytes()
                    .chain(to.bytes())
                    .fold(17u64, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as u64));
                let cost = (seed % 40) as i64 + 1;
                let duration = (seed % 900) as i64 + 60;
                let distance = (seed % 97) as f64 / 10.0 + 0.3;
                oracle = oracle.leg(from, to, cost, duration, distance);
            }
        }
        oracle
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }

    pub fn quote(&self, from: &str, to: &str) -> LegCost {
        self.legs[&(from.to_string(), to.to_string())]
    }
}

impl CostOracle for TableOracle {
    fn estimate(&self, from: &str, to: &str) -> Result<LegCost, UpstreamError> {
        self.calls.lock().push((from.to_string(), to.to_string()));
        self.legs
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .ok_or_else(|| UpstreamError::Unavailable(format!("no quote for {} -> {}", from, to)))
    }
}

pub struct ScriptedRequester {
    pub eta: i64,
    pub delay: Duration,
    failing: AtomicBool,
    requests: Mutex<Vec<(String, String)>>,
    counter: AtomicUsize,
}

impl ScriptedRequester {
    pub fn new(eta: i64) -> Self {
        Self {
            eta,
            delay: Duration::ZERO,
            failing: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
            counter: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().clone()
    }
}

impl RideRequester for ScriptedRequester {
    fn request(&self, from: &str, to: &str) -> Result<RideTicket, UpstreamError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(UpstreamError::Unavailable("ride service down".to_string()));
        }

        self.requests.lock().push((from.to_string(), to.to_string()));
        let n = self.counter.fetch_add(1, Ordering::SeqCst);

        Ok(RideTicket {
            request_id: format!("ride-{}", n),
            status: "processing".to_string(),
            eta: self.eta,
        })
    }
}
