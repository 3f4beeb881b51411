//! Client for the Star Wars API used to enrich planets.

mod client;
mod error;
mod types;

pub use client::SwapiClient;
pub use error::{Result, SwapiError};
pub use types::{Resource, SearchPage, SwapiPlanet};
