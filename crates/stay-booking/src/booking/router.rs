use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::clock::Clock;
use super::domain::{BookingId, BookingRequest};
use super::repository::BookingRepository;
use super::service::{BookingError, BookingService};

/// Query string accepted by the availability endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub from_date: NaiveDate,
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
}

/// Router builder exposing the booking endpoints.
pub fn booking_router<R, C>(service: Arc<BookingService<R, C>>) -> Router
where
    R: BookingRepository + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route("/booking", post(create_handler::<R, C>))
        .route(
            "/booking/availability",
            get(availability_handler::<R, C>),
        )
        .route(
            "/booking/:booking_id",
            get(retrieve_handler::<R, C>)
                .delete(cancel_handler::<R, C>)
                .patch(modify_handler::<R, C>),
        )
        .with_state(service)
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        match self {
            BookingError::Validation(error) => bad_request(error.to_string()),
            BookingError::NotFound => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

pub(crate) async fn availability_handler<R, C>(
    State(service): State<Arc<BookingService<R, C>>>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Response, BookingError>
where
    R: BookingRepository + 'static,
    C: Clock + 'static,
{
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return Ok(bad_request(rejection.body_text())),
    };

    let dates = service.availability(query.from_date, query.to_date)?;
    Ok(Json(dates).into_response())
}

pub(crate) async fn create_handler<R, C>(
    State(service): State<Arc<BookingService<R, C>>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Response, BookingError>
where
    R: BookingRepository + 'static,
    C: Clock + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return Ok(bad_request(rejection.body_text())),
    };

    let id = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(id)).into_response())
}

pub(crate) async fn retrieve_handler<R, C>(
    State(service): State<Arc<BookingService<R, C>>>,
    Path(booking_id): Path<String>,
) -> Result<Response, BookingError>
where
    R: BookingRepository + 'static,
    C: Clock + 'static,
{
    let id = BookingId::parse(&booking_id)?;
    let booking = service.get(&id)?;
    Ok(Json(booking.details).into_response())
}

pub(crate) async fn cancel_handler<R, C>(
    State(service): State<Arc<BookingService<R, C>>>,
    Path(booking_id): Path<String>,
) -> Result<Response, BookingError>
where
    R: BookingRepository + 'static,
    C: Clock + 'static,
{
    let id = BookingId::parse(&booking_id)?;
    service.cancel(&id)?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub(crate) async fn modify_handler<R, C>(
    State(service): State<Arc<BookingService<R, C>>>,
    Path(booking_id): Path<String>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Response, BookingError>
where
    R: BookingRepository + 'static,
    C: Clock + 'static,
{
    let id = BookingId::parse(&booking_id)?;
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return Ok(bad_request(rejection.body_text())),
    };

    let booking = service.update(&id, request).await?;
    Ok(Json(booking.details).into_response())
}
