//! List-endpoint query options shared by every store backend.

/// Exact-match filters on planets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanetFilter {
    pub name: Option<String>,
    pub climate: Option<String>,
    pub terrain: Option<String>,
    pub movie_appearances: Option<i32>,
}

/// Exact-match filters on users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ordering {
    #[default]
    Id,
    NameAsc,
    NameDesc,
}

impl Ordering {
    /// Parses an `ordering` parameter such as `name`, `-name` or
    /// `-name,created`. The first recognised field wins; unknown fields are
    /// ignored.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Id;
        };
        raw.split(',')
            .map(str::trim)
            .find_map(|field| match field {
                "name" => Some(Self::NameAsc),
                "-name" => Some(Self::NameDesc),
                _ => None,
            })
            .unwrap_or(Self::Id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery<F> {
    pub filter: F,
    /// Every term must match.
    pub search: Vec<String>,
    pub ordering: Ordering,
}

impl<F> ListQuery<F> {
    pub fn new(filter: F, search: Option<&str>, ordering: Option<&str>) -> Self {
        Self {
            filter,
            search: search_terms(search.unwrap_or_default()),
            ordering: Ordering::parse(ordering),
        }
    }
}

/// Normalises an exact-match filter value. NUL is dropped since Postgres text
/// cannot hold it; an empty value means no filter.
pub fn filter_value(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.replace('\0', "")).filter(|v| !v.is_empty())
}

/// Splits a `search` parameter on whitespace and commas.
pub fn search_terms(raw: &str) -> Vec<String> {
    raw.replace('\0', "")
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_terms_split_on_spaces_and_commas() {
        assert_eq!(search_terms("polis  massa,alder"), vec!["polis", "massa", "alder"]);
        assert!(search_terms("  , ").is_empty());
    }

    #[test]
    fn filter_values_drop_nul_and_empty() {
        assert_eq!(filter_value(Some("Hoth".into())).as_deref(), Some("Hoth"));
        assert_eq!(filter_value(Some("Ho\0th".into())).as_deref(), Some("Hoth"));
        assert!(filter_value(Some("\0".into())).is_none());
        assert!(filter_value(None).is_none());
    }

    #[test]
    fn ordering_takes_first_known_field() {
        assert_eq!(Ordering::parse(None), Ordering::Id);
        assert_eq!(Ordering::parse(Some("name")), Ordering::NameAsc);
        assert_eq!(Ordering::parse(Some("climate,-name")), Ordering::NameDesc);
        assert_eq!(Ordering::parse(Some("terrain")), Ordering::Id);
    }
}
