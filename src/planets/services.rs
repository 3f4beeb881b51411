use tracing::{info, instrument, warn};

use super::dto::PlanetDraft;
use crate::error::ApiResult;
use crate::state::AppState;
use crate::store::{NewPlanet, Planet, PlanetChanges, StoreError};

fn duplicate_name() -> StoreError {
    StoreError::Duplicate { entity: "planet", field: "name" }
}

/// Creates a planet, counting its film appearances on SWAPI first.
///
/// A failed lookup fails the whole request and nothing is stored.
#[instrument(skip(state), fields(name = %draft.name))]
pub async fn create_planet(state: &AppState, draft: PlanetDraft) -> ApiResult<Planet> {
    if state.store.planet_by_name(&draft.name).await?.is_some() {
        warn!("planet name already taken");
        return Err(duplicate_name().into());
    }

    let movie_appearances = state.swapi.planet_appearances(&draft.name).await?;

    let planet = state
        .store
        .create_planet(NewPlanet {
            name: draft.name,
            climate: draft.climate,
            terrain: draft.terrain,
            movie_appearances,
        })
        .await?;
    info!(planet_id = planet.id, movie_appearances, "planet created");
    Ok(planet)
}

/// Applies `changes`; the stored appearance count is kept as is.
#[instrument(skip(state, changes))]
pub async fn update_planet(state: &AppState, id: i64, changes: PlanetChanges) -> ApiResult<Planet> {
    if let Some(name) = &changes.name {
        if let Some(existing) = state.store.planet_by_name(name).await? {
            if existing.id != id {
                return Err(duplicate_name().into());
            }
        }
    }
    let planet = state.store.update_planet(id, changes).await?;
    info!(planet_id = planet.id, "planet updated");
    Ok(planet)
}
