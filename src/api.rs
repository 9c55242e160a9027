//! HTTP boundary.
//!
//! | Method | Path                  | Operation    |
//! |--------|-----------------------|--------------|
//! | POST   | `/trips`              | create trip  |
//! | GET    | `/trips/{id}`         | read trip    |
//! | PUT    | `/trips/{id}/request` | advance trip |

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::TripError;
use crate::progression::AdvanceOutcome;
use crate::service::{CreateTripRequest, TripService};
use crate::trip::Trip;

pub fn router(service: Arc<TripService>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trips", post(create_trip))
        .route("/trips/{id}", get(read_trip))
        .route("/trips/{id}/request", put(advance_trip))
        .with_state(service)
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    ServiceUnavailable(String),
    InternalServerError(String),
}

impl From<TripError> for ApiError {
    fn from(error: TripError) -> Self {
        let message = error.to_string();
        match error {
            TripError::Validation(_) => ApiError::BadRequest(message),
            TripError::NotFound(_) => ApiError::NotFound(message),
            TripError::Conflict(_) => ApiError::Conflict(message),
            TripError::UpstreamUnavailable(_) => ApiError::ServiceUnavailable(message),
            TripError::CorruptTrip { .. } => ApiError::InternalServerError(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message).into_response(),
            ApiError::ServiceUnavailable(message) => {
                warn!("{}", message);
                (StatusCode::SERVICE_UNAVAILABLE, message).into_response()
            }
            ApiError::InternalServerError(message) => {
                error!("{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
        }
    }
}

#[derive(Serialize)]
pub struct CompletedResponse {
    pub message: &'static str,
    pub trip: Trip,
}

/// The service blocks on upstream HTTP calls, so it runs off the async workers.
async fn run_blocking<T, F>(service: Arc<TripService>, operation: F) -> Result<T, ApiError>
where
    F: FnOnce(&TripService) -> Result<T, TripError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || operation(&service))
        .await
        .map_err(|join_error| ApiError::InternalServerError(join_error.to_string()))?
        .map_err(ApiError::from)
}

async fn health() -> &'static str {
    "ok"
}

async fn create_trip(
    State(service): State<Arc<TripService>>,
    payload: Result<Json<CreateTripRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Trip>), ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let trip = run_blocking(service, move |service| service.create_trip(request)).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

async fn read_trip(
    State(service): State<Arc<TripService>>,
    Path(id): Path<String>,
) -> Result<Json<Trip>, ApiError> {
    let trip = run_blocking(service, move |service| service.read_trip(&id)).await?;
    Ok(Json(trip))
}

async fn advance_trip(
    State(service): State<Arc<TripService>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let outcome = run_blocking(service, move |service| service.advance_trip(&id)).await?;

    let response = match outcome {
        AdvanceOutcome::Advanced(trip) => (StatusCode::CREATED, Json(trip)).into_response(),
        AdvanceOutcome::Completed(trip) => (
            StatusCode::OK,
            Json(CompletedResponse {
                message: "Trip completed",
                trip,
            }),
        )
            .into_response(),
    };
    Ok(response)
}
