use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, TokenResponse},
        password::verify_password,
        token::generate_key,
    },
    error::{ApiError, ApiResult, FieldErrors},
    extract::ApiJson,
    state::AppState,
    validate::text_field,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login/", post(login))
}

/// Exchanges email + password for the user's token.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let mut errors = FieldErrors::default();
    let username = text_field(&mut errors, "username", payload.username, false, true);
    let password = text_field(&mut errors, "password", payload.password, false, false);
    errors.into_result()?;
    let (Some(username), Some(password)) = (username, password) else {
        return Err(ApiError::InvalidCredentials);
    };
    let email = username.to_lowercase();

    let Some(user) = state.store.user_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&password, &user.password_hash).map_err(ApiError::internal)? {
        warn!(email = %email, user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.store.token_for_user(user.id, &generate_key()).await?;
    info!(user_id = user.id, "user logged in");
    Ok(Json(TokenResponse { token: token.key }))
}
