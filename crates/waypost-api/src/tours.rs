use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use waypost_types::api::{CreateTourRequest, CreateTourResponse, TourResponse};

use crate::auth::{AppState, blocking};
use crate::error::ApiError;

/// GET /paths: tours with their locations expanded.
pub async fn list_tours(State(state): State<AppState>) -> Result<Response, ApiError> {
    let tours = blocking(&state, |db| db.list_tours()).await?;

    if tours.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let body: Vec<TourResponse> = tours.into_iter().map(TourResponse::from).collect();
    Ok(Json(body).into_response())
}

pub async fn create_tour(
    State(state): State<AppState>,
    Json(req): Json<CreateTourRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = blocking(&state, move |db| {
        db.create_tour(&req.name, &req.description, &req.location_ids)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(CreateTourResponse { id })))
}
