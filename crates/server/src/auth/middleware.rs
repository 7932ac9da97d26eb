//! # Authentication Middleware
//!
//! This module provides the Axum extractor for JWT-based authentication.
//! Handlers take an `AuthenticatedUser` argument to require a valid token and
//! to learn which user is calling.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::state::AppState;

/// Represents the claims we expect to find in the JWT.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The subject of the token: the numeric user id.
    pub sub: String,
    /// The expiration timestamp.
    pub exp: usize,
}

/// An Axum extractor that provides the id of the authenticated user.
///
/// A missing, malformed, expired or wrongly signed token, or a subject that is
/// not a numeric id, rejects the request with `401 Unauthorized`.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub i64);

/// A custom rejection type for authentication failures.
pub struct AuthError(StatusCode, String);

impl AuthError {
    fn unauthorized(msg: &str) -> Self {
        AuthError(StatusCode::UNAUTHORIZED, msg.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|e| {
                    warn!("Missing or malformed Authorization header: {}", e);
                    AuthError::unauthorized("No token, authorization denied.")
                })?;

        let token_data = decode::<Claims>(
            bearer.token(),
            &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            warn!("JWT validation failed: {}", e);
            AuthError::unauthorized("Token is not valid.")
        })?;

        let user_id: i64 = token_data.claims.sub.parse().map_err(|_| {
            warn!(sub = %token_data.claims.sub, "JWT subject is not a user id.");
            AuthError::unauthorized("Token is not valid.")
        })?;

        debug!(user_id, "Authenticated request.");
        Ok(AuthenticatedUser(user_id))
    }
}
