use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    /// argon2 PHC string.
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct Planet {
    pub id: i64,
    pub name: String,
    pub climate: String,
    pub terrain: String,
    pub movie_appearances: i32,
    pub created_at: OffsetDateTime,
}

/// Opaque login token, one per user.
#[derive(Debug, Clone, FromRow)]
pub struct AuthToken {
    pub key: String,
    pub user_id: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewPlanet {
    pub name: String,
    pub climate: String,
    pub terrain: String,
    pub movie_appearances: i32,
}

/// Fields to overwrite on a user; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

/// Fields to overwrite on a planet. `movie_appearances` is not updatable.
#[derive(Debug, Clone, Default)]
pub struct PlanetChanges {
    pub name: Option<String>,
    pub climate: Option<String>,
    pub terrain: Option<String>,
}
