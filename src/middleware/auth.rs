use crate::{auth::verify_jwt, error::AppError, state::AppState};
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

/// Name of the service that presented the token.
#[derive(Debug, Clone)]
pub struct CallerService(pub String);

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized("Invalid credentials".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized("Invalid credentials".to_string()))?;

    let claims = verify_jwt(token, &state.config.jwt_secret)?;
    tracing::debug!(caller = %claims.sub, "Authenticated event publisher");

    req.extensions_mut().insert(CallerService(claims.sub));

    Ok(next.run(req).await)
}
