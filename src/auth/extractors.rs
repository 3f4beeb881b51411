use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::{debug, error, warn};

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::User;

const KEYWORD: &str = "token";

/// The caller behind a request: `Some(user)` for a valid token, `None` when
/// no token credentials were sent.
pub struct Actor(pub Option<User>);

impl Actor {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

/// Pulls the key out of an `Authorization: Token <key>` header value.
///
/// Other schemes yield `Ok(None)` so the request proceeds anonymously.
pub(crate) fn token_from_header(raw: &[u8]) -> Result<Option<String>, ApiError> {
    let value = String::from_utf8_lossy(raw);
    let mut parts = value.split_whitespace();
    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case(KEYWORD) => {}
        _ => return Ok(None),
    }
    let key = parts
        .next()
        .ok_or(ApiError::InvalidToken("Invalid token header. No credentials provided."))?;
    if parts.next().is_some() {
        return Err(ApiError::InvalidToken(
            "Invalid token header. Token string should not contain spaces.",
        ));
    }
    Ok(Some(key.to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(Actor(None));
        };
        let Some(key) = token_from_header(header.as_bytes())? else {
            return Ok(Actor(None));
        };

        match state.store.user_by_token(&key).await {
            Ok(Some(user)) => {
                debug!(user_id = user.id, "token authenticated");
                Ok(Actor(Some(user)))
            }
            Ok(None) => {
                warn!("unknown token");
                Err(ApiError::InvalidToken("Invalid token."))
            }
            Err(e) => {
                error!(error = %e, "token lookup failed");
                Err(e.into())
            }
        }
    }
}
