//! Bearer-token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::service::Identity;
use common::AppError;

/// Authenticated caller extracted from the bearer token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl From<Identity> for CurrentUser {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email,
            name: identity.name,
            image: identity.image,
        }
    }
}

/// Bearer-token authentication middleware.
///
/// Verifies the token from the Authorization header, then injects the
/// CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let identity = state.identity.verify(token)?;
    request.extensions_mut().insert(CurrentUser::from(identity));

    Ok(next.run(request).await)
}

/// Fail with Forbidden unless the caller owns the resource.
pub fn require_owner(owner_user_id: &str, user: &CurrentUser) -> Result<(), AppError> {
    if owner_user_id == user.user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
