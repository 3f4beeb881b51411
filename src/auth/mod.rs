use crate::state::AppState;
use axum::Router;

mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod password;
pub mod policy;
pub mod token;

pub use extractors::Actor;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
