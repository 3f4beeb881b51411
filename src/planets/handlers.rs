use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{PlanetListParams, PlanetPayload, PlanetResponse};
use super::services;
use crate::{
    auth::{
        policy::{enforce, planet_policy, Action},
        Actor,
    },
    error::{ApiError, ApiResult},
    extract::{parse_id, ApiJson, ApiQuery, BaseUrl},
    state::AppState,
};

pub fn planet_routes() -> Router<AppState> {
    Router::new()
        .route("/planets/", get(list_planets).post(create_planet))
        .route(
            "/planets/:id/",
            get(get_planet)
                .put(update_planet)
                .patch(partial_update_planet)
                .delete(delete_planet),
        )
}

#[instrument(skip(state, actor, base))]
pub async fn list_planets(
    State(state): State<AppState>,
    actor: Actor,
    base: BaseUrl,
    ApiQuery(params): ApiQuery<PlanetListParams>,
) -> ApiResult<Json<Vec<PlanetResponse>>> {
    enforce(planet_policy(actor.user(), Action::List), actor.user())?;
    let planets = state.store.list_planets(&params.into_query()?).await?;
    Ok(Json(planets.into_iter().map(|p| PlanetResponse::new(p, &base)).collect()))
}

#[instrument(skip(state, actor, base, body))]
pub async fn create_planet(
    State(state): State<AppState>,
    actor: Actor,
    base: BaseUrl,
    body: Result<ApiJson<PlanetPayload>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    enforce(planet_policy(actor.user(), Action::Create), actor.user())?;
    let ApiJson(payload) = body?;
    let planet = services::create_planet(&state, payload.into_draft()?).await?;
    let body = PlanetResponse::new(planet, &base);
    Ok((StatusCode::CREATED, [(header::LOCATION, body.url.clone())], Json(body)))
}

#[instrument(skip(state, actor, base))]
pub async fn get_planet(
    State(state): State<AppState>,
    actor: Actor,
    base: BaseUrl,
    Path(id): Path<String>,
) -> ApiResult<Json<PlanetResponse>> {
    enforce(planet_policy(actor.user(), Action::Retrieve), actor.user())?;
    let planet = state
        .store
        .planet_by_id(parse_id(&id)?)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(PlanetResponse::new(planet, &base)))
}

async fn apply_update(
    state: AppState,
    actor: Actor,
    base: BaseUrl,
    id: String,
    body: Result<ApiJson<PlanetPayload>, ApiError>,
    action: Action,
) -> ApiResult<Json<PlanetResponse>> {
    enforce(planet_policy(actor.user(), action), actor.user())?;
    let id = parse_id(&id)?;
    if state.store.planet_by_id(id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    let ApiJson(payload) = body?;
    let changes = payload.into_changes(action == Action::PartialUpdate)?;
    let planet = services::update_planet(&state, id, changes).await?;
    Ok(Json(PlanetResponse::new(planet, &base)))
}

#[instrument(skip(state, actor, base, body))]
pub async fn update_planet(
    State(state): State<AppState>,
    actor: Actor,
    base: BaseUrl,
    Path(id): Path<String>,
    body: Result<ApiJson<PlanetPayload>, ApiError>,
) -> ApiResult<Json<PlanetResponse>> {
    apply_update(state, actor, base, id, body, Action::Update).await
}

#[instrument(skip(state, actor, base, body))]
pub async fn partial_update_planet(
    State(state): State<AppState>,
    actor: Actor,
    base: BaseUrl,
    Path(id): Path<String>,
    body: Result<ApiJson<PlanetPayload>, ApiError>,
) -> ApiResult<Json<PlanetResponse>> {
    apply_update(state, actor, base, id, body, Action::PartialUpdate).await
}

#[instrument(skip(state, actor))]
pub async fn delete_planet(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    enforce(planet_policy(actor.user(), Action::Delete), actor.user())?;
    let id = parse_id(&id)?;
    if !state.store.delete_planet(id).await? {
        return Err(ApiError::NotFound);
    }
    info!(planet_id = id, "planet deleted");
    Ok(StatusCode::NO_CONTENT)
}
