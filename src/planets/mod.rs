mod dto;
pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use dto::{PlanetDraft, PlanetPayload, PlanetResponse};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::planet_routes())
}
