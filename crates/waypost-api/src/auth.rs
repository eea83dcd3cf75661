use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::error;

use waypost_db::{Database, StoreError};
use waypost_types::api::RegisterRequest;

use crate::error::ApiError;
use crate::weather::WeatherClient;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub weather: WeatherClient,
}

/// Run a store call on the blocking pool. SQLite and Argon2 must stay off
/// the async workers.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    blocking(&state, move |db| {
        db.register(&req.username, &req.password, &req.email, &req.nickname)
    })
    .await?;

    Ok(StatusCode::CREATED)
}
