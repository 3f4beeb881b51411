//! REST backend for user profiles and Star Wars planets.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod planets;
pub mod state;
pub mod store;
pub mod swapi;
pub mod users;
mod validate;

pub use app::build_app;
pub use state::AppState;
