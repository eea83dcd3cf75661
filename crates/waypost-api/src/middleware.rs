use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Basic};
use tracing::warn;

use crate::auth::{AppState, blocking};
use crate::error::ApiError;

/// Check HTTP Basic credentials against the account store and attach the
/// caller's `Account` to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credentials = req
        .headers()
        .typed_get::<Authorization<Basic>>()
        .ok_or(ApiError::Unauthorized)?;

    let username = credentials.username().to_string();
    let password = credentials.password().to_string();

    let account = blocking(&state, move |db| {
        if !db.authenticate(&username, &password)? {
            return Ok(None);
        }
        db.find_account(&username)
    })
    .await?;

    let Some(account) = account else {
        warn!("Rejected credentials for {}", credentials.username());
        return Err(ApiError::Unauthorized);
    };

    req.extensions_mut().insert(account);
    Ok(next.run(req).await)
}
