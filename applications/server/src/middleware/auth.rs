/// Authentication middleware
use crate::{error::ServerError, services::AuthService};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use cadence_core::UserId;
use std::sync::Arc;

/// Extension type to store authenticated user ID in request
/// Can be used as an extractor in handlers
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn user_id(&self) -> UserId {
        self.0
    }
}

/// Bearer token from the Authorization header, if one was sent
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, ServerError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(Some)
        .ok_or_else(|| ServerError::Auth("Malformed Authorization header".to_string()))
}

fn verify(auth_service: &AuthService, token: &str) -> Result<AuthenticatedUser, ServerError> {
    auth_service
        .verify_access_token(token)
        .map(AuthenticatedUser)
        .map_err(|e| {
            tracing::warn!("Token verification failed: {}", e);
            ServerError::Auth("Invalid or expired token".to_string())
        })
}

/// Middleware that extracts and validates JWT from Authorization header
pub async fn auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let token = bearer_token(request.headers())?
        .ok_or_else(|| ServerError::Auth("Missing bearer token".to_string()))?;

    let user = verify(&auth_service, token)?;

    // Insert user ID into request extensions
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Like `auth_middleware`, but lets anonymous requests through
///
/// A token that is present but invalid is still rejected.
pub async fn optional_auth_middleware(
    State(auth_service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let user = match bearer_token(request.headers())? {
        Some(token) => Some(verify(&auth_service, token)?),
        None => None,
    };

    if let Some(user) = user {
        request.extensions_mut().insert(user);
    }

    Ok(next.run(request).await)
}

/// Implement FromRequestParts so AuthenticatedUser can be used as an extractor
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| ServerError::Auth("Not authenticated".to_string()))
    }
}
