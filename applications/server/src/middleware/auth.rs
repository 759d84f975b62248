/// Authentication middleware
use crate::{error::ServerError, services::auth::TokenError, state::AppState};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use vibe_core::{User, UserId};

/// The live user record behind a verified bearer token
/// Can be used as an extractor in handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl AuthenticatedUser {
    pub fn id(&self) -> UserId {
        self.0.id
    }

    pub fn user(&self) -> &User {
        &self.0
    }
}

/// Middleware that validates the bearer token and loads its user
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(TokenError::Missing)?
        .to_str()
        .map_err(|_| TokenError::Malformed)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(TokenError::Malformed)?;

    let user_id = state.auth_service.verify_token(token)?;

    // A valid signature is not enough once the account is gone
    let user = vibe_storage::users::get_by_id(&state.pool, user_id)
        .await?
        .ok_or(TokenError::UnknownUser)?;

    request.extensions_mut().insert(AuthenticatedUser(user));

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
            .cloned()
            .ok_or(ServerError::Token(TokenError::Missing))
    }
}
