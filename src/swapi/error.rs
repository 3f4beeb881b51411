//! Errors raised while talking to SWAPI.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwapiError {
    /// The API answered with anything other than 200.
    #[error("resource unavailable: {url} returned {status}")]
    ResourceUnavailable { url: String, status: u16 },

    /// The request never produced a response.
    #[error("swapi request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not the JSON we expected.
    #[error("failed to decode swapi response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, SwapiError>;
