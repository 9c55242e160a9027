//! Ride-hailing HTTP adapter for price estimates and ride requests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::UpstreamError;
use crate::traits::{Coordinate, CostOracle, LegCost, LocationDirectory, RideRequester, RideTicket};
use crate::trip::LocationId;

#[derive(Debug, Clone)]
pub struct UberConfig {
    pub base_url: String,
    pub access_token: String,
    pub timeout_secs: u64,
}

impl Default for UberConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sandbox-api.uber.com/v1".to_string(),
            access_token: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Client shared by every planning and advance call; the underlying
/// connection pool is created once.
#[derive(Clone)]
pub struct UberClient {
    config: UberConfig,
    client: reqwest::blocking::Client,
    directory: Arc<dyn LocationDirectory>,
    /// Product quoted from each pickup location, fetched once per client.
    quoted_products: Arc<RwLock<HashMap<LocationId, String>>>,
}

impl UberClient {
    pub fn new(
        config: UberConfig,
        directory: Arc<dyn LocationDirectory>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            directory,
            quoted_products: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// First product offered at `at`; all quotes and bookings use it.
    fn product_near(&self, at: Coordinate) -> Result<String, UpstreamError> {
        let response = self
            .client
            .get(self.url("products"))
            .bearer_auth(&self.config.access_token)
            .query(&[("latitude", at.lat), ("longitude", at.lng)])
            .send()?;
        let body: ProductsResponse = check_status(response)?.json()?;

        body.products
            .into_iter()
            .next()
            .map(|product| product.product_id)
            .ok_or_else(|| UpstreamError::NoProduct(format!("{:.6},{:.6}", at.lat, at.lng)))
    }

    /// Product used for price estimates from `location`. Every candidate of a
    /// planning hop shares the origin, so `/products` is hit once per origin.
    fn quoted_product(&self, location: &str, at: Coordinate) -> Result<String, UpstreamError> {
        if let Some(product) = self.quoted_products.read().get(location) {
            return Ok(product.clone());
        }

        // Held across the fetch so a parallel hop does not race n lookups.
        let mut products = self.quoted_products.write();
        if let Some(product) = products.get(location) {
            return Ok(product.clone());
        }
        let product = self.product_near(at)?;
        products.insert(location.to_string(), product.clone());
        Ok(product)
    }
}

impl CostOracle for UberClient {
    fn estimate(&self, from: &str, to: &str) -> Result<LegCost, UpstreamError> {
        let start = self.directory.resolve(from)?;
        let end = self.directory.resolve(to)?;
        let product_id = self.quoted_product(from, start)?;

        let response = self
            .client
            .get(self.url("estimates/price"))
            .bearer_auth(&self.config.access_token)
            .query(&[
                ("start_latitude", start.lat),
                ("start_longitude", start.lng),
                ("end_latitude", end.lat),
                ("end_longitude", end.lng),
            ])
            .send()?;
        let body: PriceEstimatesResponse = check_status(response)?.json()?;

        let price = body
            .prices
            .into_iter()
            .find(|price| price.product_id == product_id)
            .ok_or_else(|| UpstreamError::MissingEstimate(product_id.clone()))?;
        let cost = price
            .low_estimate
            .ok_or_else(|| UpstreamError::MissingEstimate(product_id.clone()))?;

        debug!(from, to, product = %product_id, cost, "price estimate");

        Ok(LegCost {
            cost,
            duration: price.duration,
            distance: price.distance,
        })
    }
}

impl RideRequester for UberClient {
    fn request(&self, from: &str, to: &str) -> Result<RideTicket, UpstreamError> {
        let start = self.directory.resolve(from)?;
        let end = self.directory.resolve(to)?;
        let product_id = self.product_near(start)?;

        let body = RideRequestBody {
            product_id,
            start_latitude: start.lat,
            start_longitude: start.lng,
            end_latitude: end.lat,
            end_longitude: end.lng,
        };

        let response = self
            .client
            .post(self.url("requests"))
            .bearer_auth(&self.config.access_token)
            .json(&body)
            .send()?;
        let ride: RideRequestResponse = check_status(response)?.json()?;

        let eta = ride
            .eta
            .ok_or_else(|| UpstreamError::MissingEta(ride.request_id.clone()))?;

        Ok(RideTicket {
            request_id: ride.request_id,
            status: ride.status,
            eta,
        })
    }
}

fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().unwrap_or_default();
    Err(UpstreamError::Api {
        status: status.as_u16(),
        message,
    })
}

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    product_id: String,
}

#[derive(Debug, Deserialize)]
struct PriceEstimatesResponse {
    #[serde(default)]
    prices: Vec<PriceEstimate>,
}

#[derive(Debug, Deserialize)]
struct PriceEstimate {
    product_id: String,
    low_estimate: Option<i64>,
    /// Seconds.
    duration: i64,
    /// Miles.
    distance: f64,
}

#[derive(Debug, Serialize)]
struct RideRequestBody {
    product_id: String,
    start_latitude: f64,
    start_longitude: f64,
    end_latitude: f64,
    end_longitude: f64,
}

#[derive(Debug, Deserialize)]
struct RideRequestResponse {
    request_id: String,
    #[serde(default)]
    status: String,
    eta: Option<i64>,
}
