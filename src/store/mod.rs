//! Persistence for users, planets and login tokens.

use async_trait::async_trait;
use thiserror::Error;

mod memory;
mod models;
mod postgres;
mod query;

pub use memory::MemoryStore;
pub use models::{AuthToken, NewPlanet, NewUser, Planet, PlanetChanges, User, UserChanges};
pub use postgres::PgStore;
pub use query::{filter_value, search_terms, ListQuery, Ordering, PlanetFilter, UserFilter};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("{entity} with this {field} already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, new: NewUser) -> Result<User>;
    async fn user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn list_users(&self, query: &ListQuery<UserFilter>) -> Result<Vec<User>>;
    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User>;
    async fn delete_user(&self, id: i64) -> Result<bool>;

    /// Returns the user's token, inserting `fresh_key` if they have none yet.
    async fn token_for_user(&self, user_id: i64, fresh_key: &str) -> Result<AuthToken>;
    async fn user_by_token(&self, key: &str) -> Result<Option<User>>;

    async fn create_planet(&self, new: NewPlanet) -> Result<Planet>;
    async fn planet_by_id(&self, id: i64) -> Result<Option<Planet>>;
    async fn planet_by_name(&self, name: &str) -> Result<Option<Planet>>;
    async fn list_planets(&self, query: &ListQuery<PlanetFilter>) -> Result<Vec<Planet>>;
    async fn update_planet(&self, id: i64, changes: PlanetChanges) -> Result<Planet>;
    async fn delete_planet(&self, id: i64) -> Result<bool>;
}
