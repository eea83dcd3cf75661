pub mod auth;
pub mod error;
pub mod locations;
pub mod middleware;
pub mod tours;
pub mod weather;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::auth::AppState;
use crate::middleware::require_auth;

/// All routes. Registration is public, everything else needs Basic credentials.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/registration", post(auth::register))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/info", get(locations::list_locations).post(locations::create_location))
        .route("/info/{id}", get(locations::get_location).put(locations::update_location))
        .route("/info/{id}/visit", post(locations::visit_location))
        .route("/topfive", get(locations::top_locations))
        .route("/paths", get(tours::list_tours).post(tours::create_tour))
        .layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
