//! Typed views over SWAPI payloads.
//!
//! Every field is optional and unknown keys are ignored, so a partially
//! populated upstream record still decodes.

use serde::Deserialize;

/// Resource collections exposed by SWAPI that this service reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Planets,
}

impl Resource {
    pub fn as_path(self) -> &'static str {
        match self {
            Resource::Planets => "planets",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_path())
    }
}

/// One page of a `?search=` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SwapiPlanet {
    pub name: Option<String>,
    pub rotation_period: Option<String>,
    pub orbital_period: Option<String>,
    pub diameter: Option<String>,
    pub climate: Option<String>,
    pub gravity: Option<String>,
    pub terrain: Option<String>,
    pub surface_water: Option<String>,
    pub population: Option<String>,
    pub residents: Vec<String>,
    pub films: Vec<String>,
    pub created: Option<String>,
    pub edited: Option<String>,
    pub url: Option<String>,
}

impl SwapiPlanet {
    pub fn film_count(&self) -> usize {
        self.films.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planet_ignores_unknown_keys_and_missing_fields() {
        let raw = r#"{"name":"Hoth","films":["f/2/"],"moons":3}"#;
        let planet: SwapiPlanet = serde_json::from_str(raw).unwrap();
        assert_eq!(planet.name.as_deref(), Some("Hoth"));
        assert_eq!(planet.film_count(), 1);
        assert!(planet.climate.is_none());
        assert!(planet.residents.is_empty());
    }

    #[test]
    fn empty_search_page_decodes() {
        let page: SearchPage<SwapiPlanet> =
            serde_json::from_str(r#"{"count":0,"next":null,"previous":null,"results":[]}"#)
                .unwrap();
        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
    }
}
