use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::error::{Result, SwapiError};
use super::types::{Resource, SearchPage, SwapiPlanet};
use crate::config::SwapiConfig;

/// Thin read-only client for the public Star Wars API.
#[derive(Clone, Debug)]
pub struct SwapiClient {
    http: Client,
    base_url: String,
}

impl SwapiClient {
    pub fn new(config: &SwapiConfig) -> Result<Self> {
        let http = Client::builder().user_agent(config.user_agent.clone()).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/{resource}/{id}/`
    pub async fn fetch_by_id<T: DeserializeOwned>(&self, id: u64, resource: Resource) -> Result<T> {
        let url = format!("{}/{}/{}/", self.base_url, resource, id);
        self.get_json(&url, &[]).await
    }

    /// `GET {base}/{resource}/?search={term}`, returning the first page only.
    pub async fn search<T: DeserializeOwned>(
        &self,
        term: &str,
        resource: Resource,
    ) -> Result<SearchPage<T>> {
        let url = format!("{}/{}/", self.base_url, resource);
        self.get_json(&url, &[("search", term)]).await
    }

    pub async fn planet(&self, id: u64) -> Result<SwapiPlanet> {
        self.fetch_by_id(id, Resource::Planets).await
    }

    /// Number of films the planet called `name` appears in.
    ///
    /// Only the first search hit is inspected, so a name that is a substring
    /// of several planets counts whichever SWAPI lists first.
    #[instrument(skip(self))]
    pub async fn planet_appearances(&self, name: &str) -> Result<i32> {
        let page: SearchPage<SwapiPlanet> = self.search(name, Resource::Planets).await?;
        if page.count == 0 {
            debug!("no swapi match");
            return Ok(0);
        }
        let films = page.results.first().map(SwapiPlanet::film_count).unwrap_or(0);
        debug!(films, matches = page.count, "swapi planet appearances");
        Ok(i32::try_from(films).unwrap_or(i32::MAX))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let mut request = self.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(%url, status = status.as_u16(), "swapi resource unavailable");
            return Err(SwapiError::ResourceUnavailable {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| SwapiError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = SwapiClient::new(&SwapiConfig::new("https://swapi.example/api/")).unwrap();
        assert_eq!(client.base_url(), "https://swapi.example/api");
    }
}
