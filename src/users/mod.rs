mod dto;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub use dto::{UserPayload, UserResponse};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
