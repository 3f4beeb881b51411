use serde::{Deserialize, Serialize};

use crate::error::{ApiResult, FieldErrors, MSG_INVALID_NUMBER};
use crate::extract::BaseUrl;
use crate::store::{filter_value, ListQuery, Planet, PlanetChanges, PlanetFilter};
use crate::validate::text_field;

/// Incoming planet fields. `movie_appearances` is read-only and ignored if
/// a client sends it.
#[derive(Debug, Default, Deserialize)]
pub struct PlanetPayload {
    pub name: Option<String>,
    pub climate: Option<String>,
    pub terrain: Option<String>,
}

/// A planet body that passed validation but has no appearance count yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanetDraft {
    pub name: String,
    pub climate: String,
    pub terrain: String,
}

impl PlanetPayload {
    fn check(self, partial: bool) -> ApiResult<PlanetChanges> {
        let mut errors = FieldErrors::default();
        let name = text_field(&mut errors, "name", self.name, partial, true);
        let climate = text_field(&mut errors, "climate", self.climate, partial, true);
        let terrain = text_field(&mut errors, "terrain", self.terrain, partial, true);
        errors.into_result()?;
        Ok(PlanetChanges { name, climate, terrain })
    }

    pub fn into_draft(self) -> ApiResult<PlanetDraft> {
        match self.check(false)? {
            PlanetChanges {
                name: Some(name),
                climate: Some(climate),
                terrain: Some(terrain),
            } => Ok(PlanetDraft { name, climate, terrain }),
            _ => Err(crate::error::ApiError::internal("validated planet lost a field")),
        }
    }

    /// `partial` is set for PATCH.
    pub fn into_changes(self, partial: bool) -> ApiResult<PlanetChanges> {
        self.check(partial)
    }
}

#[derive(Debug, Serialize)]
pub struct PlanetResponse {
    pub id: i64,
    pub name: String,
    pub climate: String,
    pub terrain: String,
    pub movie_appearances: i32,
    pub url: String,
}

impl PlanetResponse {
    pub fn new(planet: Planet, base: &BaseUrl) -> Self {
        Self {
            url: base.resource("planets", planet.id),
            id: planet.id,
            name: planet.name,
            climate: planet.climate,
            terrain: planet.terrain,
            movie_appearances: planet.movie_appearances,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanetListParams {
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub name: Option<String>,
    pub climate: Option<String>,
    pub terrain: Option<String>,
    pub movie_appearances: Option<String>,
}

impl PlanetListParams {
    pub fn into_query(self) -> ApiResult<ListQuery<PlanetFilter>> {
        let mut errors = FieldErrors::default();
        let movie_appearances = match filter_value(self.movie_appearances) {
            Some(raw) => match raw.trim().parse::<i32>() {
                Ok(n) => Some(n),
                Err(_) => {
                    errors.add("movie_appearances", MSG_INVALID_NUMBER);
                    None
                }
            },
            None => None,
        };
        errors.into_result()?;

        let filter = PlanetFilter {
            name: filter_value(self.name),
            climate: filter_value(self.climate),
            terrain: filter_value(self.terrain),
            movie_appearances,
        };
        Ok(ListQuery::new(filter, self.search.as_deref(), self.ordering.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, MSG_BLANK, MSG_REQUIRED};
    use crate::store::Ordering;

    #[test]
    fn create_requires_all_fields() {
        let payload = PlanetPayload { name: Some("Alderaan".into()), climate: Some(" ".into()), terrain: None };
        let Err(ApiError::Validation(errors)) = payload.into_draft() else {
            panic!("expected validation error");
        };
        assert!(errors.get("name").is_none());
        assert_eq!(errors.get("climate").unwrap(), [MSG_BLANK.to_string()]);
        assert_eq!(errors.get("terrain").unwrap(), [MSG_REQUIRED.to_string()]);
    }

    #[test]
    fn draft_trims_fields() {
        let payload = PlanetPayload {
            name: Some(" Alderaan ".into()),
            climate: Some("temperate".into()),
            terrain: Some("grasslands, mountains".into()),
        };
        let draft = payload.into_draft().unwrap();
        assert_eq!(draft.name, "Alderaan");
        assert_eq!(draft.terrain, "grasslands, mountains");
    }

    #[test]
    fn read_only_field_is_ignored_on_input() {
        let payload: PlanetPayload = serde_json::from_str(
            r#"{"name":"Hoth","climate":"frozen","terrain":"tundra","movie_appearances":99}"#,
        )
        .unwrap();
        assert!(payload.into_draft().is_ok());
    }

    #[test]
    fn list_params_build_query() {
        let params = PlanetListParams {
            search: Some("ald".into()),
            ordering: Some("-name".into()),
            climate: Some("temperate".into()),
            movie_appearances: Some("2".into()),
            name: Some(String::new()),
            ..Default::default()
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.search, vec!["ald"]);
        assert_eq!(query.ordering, Ordering::NameDesc);
        assert_eq!(query.filter.climate.as_deref(), Some("temperate"));
        assert_eq!(query.filter.movie_appearances, Some(2));
        assert!(query.filter.name.is_none());
    }

    #[test]
    fn non_numeric_appearance_filter_is_rejected() {
        let params = PlanetListParams { movie_appearances: Some("two".into()), ..Default::default() };
        let Err(ApiError::Validation(errors)) = params.into_query() else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("movie_appearances").unwrap(), [MSG_INVALID_NUMBER.to_string()]);
    }
}
