use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use waypost_db::locations::TOP_LOCATIONS;
use waypost_types::api::{
    CreateLocationRequest, CreateLocationResponse, LocationResponse, TopLocationResponse,
    UpdateLocationRequest,
};
use waypost_types::models::{Account, Coordinates, LocationInput, LocationUpdate};
use waypost_types::timestamp;

use crate::auth::{AppState, blocking};
use crate::error::ApiError;

/// GET /info, 204 when nothing has been posted yet.
pub async fn list_locations(State(state): State<AppState>) -> Result<Response, ApiError> {
    let locations = blocking(&state, |db| db.list_locations()).await?;

    if locations.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let body: Vec<LocationResponse> = locations.into_iter().map(LocationResponse::from).collect();
    Ok(Json(body).into_response())
}

/// POST /info. The author is the caller's nickname. Weather is looked up
/// only when both coordinates are present.
pub async fn create_location(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Json(req): Json<CreateLocationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let coordinates = Coordinates::from_pair(req.latitude, req.longitude)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    // Reject before spending a weather request on it.
    if req.name.is_empty() {
        return Err(ApiError::BadRequest("location name is required".into()));
    }
    timestamp::parse(&req.posted_at).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let weather = match coordinates {
        Some(c) => state.weather.fetch_temperature(c.latitude, c.longitude).await,
        None => None,
    };

    let input = LocationInput {
        name: req.name,
        description: req.description,
        city: req.city,
        country: req.country,
        street_address: req.street_address,
        posted_at: req.posted_at,
        author: account.nickname,
        coordinates,
        weather,
    };

    let id = blocking(&state, move |db| db.create_location(&input)).await?;

    Ok((StatusCode::CREATED, Json(CreateLocationResponse { id })))
}

pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let location = blocking(&state, move |db| db.get_location(id))
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(LocationResponse::from(location)))
}

pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateLocationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let coordinates = Coordinates::from_pair(req.latitude, req.longitude)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let update = LocationUpdate {
        name: req.name,
        description: req.description,
        city: req.city,
        country: req.country,
        street_address: req.street_address,
        coordinates,
    };
    let reason = req.reason;

    blocking(&state, move |db| db.update_location(id, &update, &reason)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /info/{id}/visit. Unknown ids are accepted and ignored.
pub async fn visit_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(&state, move |db| db.visit_location(id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /topfive
pub async fn top_locations(State(state): State<AppState>) -> Result<Response, ApiError> {
    let ranking = blocking(&state, |db| db.top_locations(TOP_LOCATIONS)).await?;

    if ranking.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let body: Vec<TopLocationResponse> = ranking.into_iter().map(TopLocationResponse::from).collect();
    Ok(Json(body).into_response())
}
