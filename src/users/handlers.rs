use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{UserListParams, UserPayload, UserResponse};
use crate::{
    auth::{
        policy::{enforce, user_policy, Action},
        Actor,
    },
    error::{ApiError, ApiResult},
    extract::{parse_id, ApiJson, ApiQuery, BaseUrl},
    state::AppState,
    store::{StoreError, User},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/", get(list_users).post(create_user))
        .route(
            "/users/:id/",
            get(get_user)
                .put(update_user)
                .patch(partial_update_user)
                .delete(delete_user),
        )
}

async fn load_user(state: &AppState, raw_id: &str) -> ApiResult<User> {
    let id = parse_id(raw_id)?;
    state.store.user_by_id(id).await?.ok_or(ApiError::NotFound)
}

#[instrument(skip(state, actor, base))]
pub async fn list_users(
    State(state): State<AppState>,
    actor: Actor,
    base: BaseUrl,
    ApiQuery(params): ApiQuery<UserListParams>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    enforce(user_policy(actor.user(), None, Action::List), actor.user())?;
    let users = state.store.list_users(&params.into_query()).await?;
    Ok(Json(users.into_iter().map(|u| UserResponse::new(u, &base)).collect()))
}

/// Signup. Open to anonymous callers.
#[instrument(skip(state, actor, base, body))]
pub async fn create_user(
    State(state): State<AppState>,
    actor: Actor,
    base: BaseUrl,
    body: Result<ApiJson<UserPayload>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    enforce(user_policy(actor.user(), None, Action::Create), actor.user())?;
    let ApiJson(payload) = body?;
    let new = payload.into_new_user()?;

    if state.store.user_by_email(&new.email).await?.is_some() {
        warn!(email = %new.email, "email already registered");
        return Err(StoreError::Duplicate { entity: "user profile", field: "email" }.into());
    }

    let user = state.store.create_user(new).await?;
    info!(user_id = user.id, email = %user.email, "user registered");
    let body = UserResponse::new(user, &base);
    Ok((StatusCode::CREATED, [(header::LOCATION, body.url.clone())], Json(body)))
}

#[instrument(skip(state, actor, base))]
pub async fn get_user(
    State(state): State<AppState>,
    actor: Actor,
    base: BaseUrl,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user = load_user(&state, &id).await?;
    enforce(user_policy(actor.user(), Some(&user), Action::Retrieve), actor.user())?;
    Ok(Json(UserResponse::new(user, &base)))
}

async fn apply_update(
    state: AppState,
    actor: Actor,
    base: BaseUrl,
    id: String,
    body: Result<ApiJson<UserPayload>, ApiError>,
    action: Action,
) -> ApiResult<Json<UserResponse>> {
    let target = load_user(&state, &id).await?;
    enforce(user_policy(actor.user(), Some(&target), action), actor.user())?;
    let ApiJson(payload) = body?;
    let changes = payload.into_changes(action == Action::PartialUpdate)?;
    let user = state.store.update_user(target.id, changes).await?;
    info!(user_id = user.id, "profile updated");
    Ok(Json(UserResponse::new(user, &base)))
}

#[instrument(skip(state, actor, base, body))]
pub async fn update_user(
    State(state): State<AppState>,
    actor: Actor,
    base: BaseUrl,
    Path(id): Path<String>,
    body: Result<ApiJson<UserPayload>, ApiError>,
) -> ApiResult<Json<UserResponse>> {
    apply_update(state, actor, base, id, body, Action::Update).await
}

#[instrument(skip(state, actor, base, body))]
pub async fn partial_update_user(
    State(state): State<AppState>,
    actor: Actor,
    base: BaseUrl,
    Path(id): Path<String>,
    body: Result<ApiJson<UserPayload>, ApiError>,
) -> ApiResult<Json<UserResponse>> {
    apply_update(state, actor, base, id, body, Action::PartialUpdate).await
}

#[instrument(skip(state, actor))]
pub async fn delete_user(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let target = load_user(&state, &id).await?;
    enforce(user_policy(actor.user(), Some(&target), Action::Delete), actor.user())?;
    if !state.store.delete_user(target.id).await? {
        return Err(ApiError::NotFound);
    }
    info!(user_id = target.id, "profile deleted");
    Ok(StatusCode::NO_CONTENT)
}
