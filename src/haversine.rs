//! Haversine cost oracle (fallback when the ride-hailing API is unavailable).
//!
//! Prices legs from great-circle distance with a flat fare model.
//! Less accurate than live quotes (ignores roads and surge) but always
//! available, which makes it the default for local runs.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::UpstreamError;
use crate::traits::{CostOracle, LegCost, LocationDirectory, RideRequester, RideTicket};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

const MILES_PER_KM: f64 = 0.621_371;

#[derive(Debug, Clone)]
pub struct FareModel {
    pub base_fare: i64,
    pub per_mile: f64,
    /// Pickup ETA reported for booked rides, in minutes.
    pub pickup_eta: i64,
}

impl Default for FareModel {
    fn default() -> Self {
        Self {
            base_fare: 5,
            per_mile: 2.0,
            pickup_eta: 4,
        }
    }
}

/// Haversine-based oracle and ride requester.
#[derive(Clone)]
pub struct HaversineOracle {
    directory: Arc<dyn LocationDirectory>,
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
    pub fare: FareModel,
}

impl HaversineOracle {
    pub fn new(directory: Arc<dyn LocationDirectory>) -> Self {
        Self {
            directory,
            speed_kmh: DEFAULT_SPEED_KMH,
            fare: FareModel::default(),
        }
    }

    pub fn with_speed(mut self, speed_kmh: f64) -> Self {
        self.speed_kmh = speed_kmh;
        self
    }

    pub fn with_fare(mut self, fare: FareModel) -> Self {
        self.fare = fare;
        self
    }

    /// Calculate haversine distance between two points in kilometers.
    fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Convert distance in km to travel time in seconds.
    fn km_to_seconds(&self, km: f64) -> i64 {
        let hours = km / self.speed_kmh;
        (hours * 3600.0).round() as i64
    }

    fn fare_for(&self, miles: f64) -> i64 {
        self.fare.base_fare + (miles * self.fare.per_mile).round() as i64
    }
}

impl CostOracle for HaversineOracle {
    fn estimate(&self, from: &str, to: &str) -> Result<LegCost, UpstreamError> {
        let start = self.directory.resolve(from)?;
        let end = self.directory.resolve(to)?;

        let km = Self::haversine_km((start.lat, start.lng), (end.lat, end.lng));
        let miles = km * MILES_PER_KM;

        Ok(LegCost {
            cost: self.fare_for(miles),
            duration: self.km_to_seconds(km),
            distance: miles,
        })
    }
}

impl RideRequester for HaversineOracle {
    fn request(&self, from: &str, to: &str) -> Result<RideTicket, UpstreamError> {
        self.directory.resolve(from)?;
        self.directory.resolve(to)?;

        Ok(RideTicket {
            request_id: Uuid::new_v4().to_string(),
            status: "processing".to_string(),
            eta: self.fare.pickup_eta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{InMemoryLocationDirectory, LocationRecord};
    use crate::traits::Coordinate;

    fn oracle() -> HaversineOracle {
        let record = |id: &str, lat, lng| LocationRecord {
            id: id.to_string(),
            name: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            coordinate: Coordinate::new(lat, lng),
        };
        let directory = InMemoryLocationDirectory::from_records([
            record("las-vegas", 36.17, -115.14),
            record("los-angeles", 34.05, -118.24),
        ]);
        HaversineOracle::new(Arc::new(directory))
    }

    #[test]
    fn haversine_same_point() {
        let dist = HaversineOracle::haversine_km((36.1, -115.1), (36.1, -115.1));
        assert!(dist < 0.001, "Same point should have ~0 distance");
    }

    #[test]
    fn haversine_known_distance() {
        // Las Vegas (36.17, -115.14) to Los Angeles (34.05, -118.24)
        // Actual distance ~370 km
        let dist = HaversineOracle::haversine_km((36.17, -115.14), (34.05, -118.24));
        assert!(dist > 350.0 && dist < 400.0, "LV to LA should be ~370km, got {}", dist);
    }

    #[test]
    fn reasonable_travel_time() {
        let oracle = oracle().with_speed(40.0);
        // 10 km at 40 km/h = 0.25 hours = 900 seconds
        assert_eq!(oracle.km_to_seconds(10.0), 900);
    }

    #[test]
    fn estimate_is_symmetric() {
        let oracle = oracle();
        let there = oracle.estimate("las-vegas", "los-angeles").unwrap();
        let back = oracle.estimate("los-angeles", "las-vegas").unwrap();
        assert_eq!(there, back);
        assert!(there.distance > 215.0 && there.distance < 250.0);
    }

    #[test]
    fn fare_grows_with_distance() {
        let oracle = oracle().with_fare(FareModel {
            base_fare: 3,
            per_mile: 1.0,
            pickup_eta: 2,
        });
        assert_eq!(oracle.fare_for(0.0), 3);
        assert_eq!(oracle.fare_for(10.4), 13);
    }

    #[test]
    fn unknown_location_fails() {
        let oracle = oracle();
        assert!(matches!(
            oracle.estimate("las-vegas", "reno"),
            Err(UpstreamError::UnknownLocation(_))
        ));
        assert!(oracle.request("reno", "las-vegas").is_err());
    }

    #[test]
    fn request_reports_pickup_eta() {
        let ticket = oracle().request("las-vegas", "los-angeles").unwrap();
        assert_eq!(ticket.eta, FareModel::default().pickup_eta);
        assert!(!ticket.request_id.is_empty());
    }
}
