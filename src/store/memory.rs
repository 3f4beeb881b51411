use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::models::{AuthToken, NewPlanet, NewUser, Planet, PlanetChanges, User, UserChanges};
use super::query::{ListQuery, Ordering, PlanetFilter, UserFilter};
use super::{Result, Store, StoreError};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    planets: Vec<Planet>,
    tokens: Vec<AuthToken>,
    last_user_id: i64,
    last_planet_id: i64,
}

/// Process-local store with the same constraints as the Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn starts_with_ci(haystack: &str, prefix: &str) -> bool {
    haystack.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Case-folded name, then the raw name, matching `PgStore`'s
/// `LOWER(name) COLLATE "C"` ordering. Ties fall back to id.
fn sort_by_name<T>(rows: &mut [T], ordering: Ordering, name: impl Fn(&T) -> &str, id: impl Fn(&T) -> i64) {
    let key = |r: &T| (name(r).to_lowercase(), name(r).to_string());
    match ordering {
        Ordering::Id => rows.sort_by_key(|r| id(r)),
        Ordering::NameAsc => rows.sort_by(|a, b| key(a).cmp(&key(b)).then(id(a).cmp(&id(b)))),
        Ordering::NameDesc => rows.sort_by(|a, b| key(b).cmp(&key(a)).then(id(a).cmp(&id(b)))),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User> {
        let mut t = self.tables.lock().await;
        if t.users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::Duplicate { entity: "user profile", field: "email" });
        }
        t.last_user_id += 1;
        let user = User {
            id: t.last_user_id,
            email: new.email,
            name: new.name,
            password_hash: new.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        let t = self.tables.lock().await;
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let t = self.tables.lock().await;
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, query: &ListQuery<UserFilter>) -> Result<Vec<User>> {
        let t = self.tables.lock().await;
        let f = &query.filter;
        let mut rows: Vec<User> = t
            .users
            .iter()
            .filter(|u| f.name.as_ref().map_or(true, |n| &u.name == n))
            .filter(|u| f.email.as_ref().map_or(true, |e| &u.email == e))
            .filter(|u| {
                query
                    .search
                    .iter()
                    .all(|term| contains_ci(&u.name, term) || contains_ci(&u.email, term))
            })
            .cloned()
            .collect();
        sort_by_name(&mut rows, query.ordering, |u| u.name.as_str(), |u| u.id);
        Ok(rows)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User> {
        let mut t = self.tables.lock().await;
        if let Some(email) = &changes.email {
            if t.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::Duplicate { entity: "user profile", field: "email" });
            }
        }
        let user = t
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound("user"))?;
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        Ok(user.clone())
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        let mut t = self.tables.lock().await;
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        t.tokens.retain(|tok| tok.user_id != id);
        Ok(t.users.len() < before)
    }

    async fn token_for_user(&self, user_id: i64, fresh_key: &str) -> Result<AuthToken> {
        let mut t = self.tables.lock().await;
        if let Some(existing) = t.tokens.iter().find(|tok| tok.user_id == user_id) {
            return Ok(existing.clone());
        }
        if !t.users.iter().any(|u| u.id == user_id) {
            return Err(StoreError::NotFound("user"));
        }
        let token = AuthToken {
            key: fresh_key.to_string(),
            user_id,
            created_at: OffsetDateTime::now_utc(),
        };
        t.tokens.push(token.clone());
        Ok(token)
    }

    async fn user_by_token(&self, key: &str) -> Result<Option<User>> {
        let t = self.tables.lock().await;
        let Some(token) = t.tokens.iter().find(|tok| tok.key == key) else {
            return Ok(None);
        };
        Ok(t.users.iter().find(|u| u.id == token.user_id).cloned())
    }

    async fn create_planet(&self, new: NewPlanet) -> Result<Planet> {
        let mut t = self.tables.lock().await;
        if t.planets.iter().any(|p| p.name == new.name) {
            return Err(StoreError::Duplicate { entity: "planet", field: "name" });
        }
        t.last_planet_id += 1;
        let planet = Planet {
            id: t.last_planet_id,
            name: new.name,
            climate: new.climate,
            terrain: new.terrain,
            movie_appearances: new.movie_appearances,
            created_at: OffsetDateTime::now_utc(),
        };
        t.planets.push(planet.clone());
        Ok(planet)
    }

    async fn planet_by_id(&self, id: i64) -> Result<Option<Planet>> {
        let t = self.tables.lock().await;
        Ok(t.planets.iter().find(|p| p.id == id).cloned())
    }

    async fn planet_by_name(&self, name: &str) -> Result<Option<Planet>> {
        let t = self.tables.lock().await;
        Ok(t.planets.iter().find(|p| p.name == name).cloned())
    }

    async fn list_planets(&self, query: &ListQuery<PlanetFilter>) -> Result<Vec<Planet>> {
        let t = self.tables.lock().await;
        let f = &query.filter;
        let mut rows: Vec<Planet> = t
            .planets
            .iter()
            .filter(|p| f.name.as_ref().map_or(true, |v| &p.name == v))
            .filter(|p| f.climate.as_ref().map_or(true, |v| &p.climate == v))
            .filter(|p| f.terrain.as_ref().map_or(true, |v| &p.terrain == v))
            .filter(|p| f.movie_appearances.map_or(true, |v| p.movie_appearances == v))
            .filter(|p| query.search.iter().all(|term| starts_with_ci(&p.name, term)))
            .cloned()
            .collect();
        sort_by_name(&mut rows, query.ordering, |p| p.name.as_str(), |p| p.id);
        Ok(rows)
    }

    async fn update_planet(&self, id: i64, changes: PlanetChanges) -> Result<Planet> {
        let mut t = self.tables.lock().await;
        if let Some(name) = &changes.name {
            if t.planets.iter().any(|p| p.id != id && &p.name == name) {
                return Err(StoreError::Duplicate { entity: "planet", field: "name" });
            }
        }
        let planet = t
            .planets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound("planet"))?;
        if let Some(name) = changes.name {
            planet.name = name;
        }
        if let Some(climate) = changes.climate {
            planet.climate = climate;
        }
        if let Some(terrain) = changes.terrain {
            planet.terrain = terrain;
        }
        Ok(planet.clone())
    }

    async fn delete_planet(&self, id: i64) -> Result<bool> {
        let mut t = self.tables.lock().await;
        let before = t.planets.len();
        t.planets.retain(|p| p.id != id);
        Ok(t.planets.len() < before)
    }
}
