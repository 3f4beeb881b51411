use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, QueryBuilder};
use tracing::debug;

use super::models::{AuthToken, NewPlanet, NewUser, Planet, PlanetChanges, User, UserChanges};
use super::query::{ListQuery, Ordering, PlanetFilter, UserFilter};
use super::{Result, Store, StoreError};

const USER_COLUMNS: &str = "id, email, name, password_hash, created_at";
const PLANET_COLUMNS: &str = "id, name, climate, terrain, movie_appearances, created_at";

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unique_violation(err: sqlx::Error, entity: &'static str, field: &'static str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate { entity, field }
        }
        _ => StoreError::Database(err),
    }
}

/// Escapes `%`, `_` and `\` so user input is matched literally by ILIKE.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn push_ordering(qb: &mut QueryBuilder<'_, Postgres>, ordering: Ordering) {
    qb.push(match ordering {
        Ordering::Id => " ORDER BY id ASC",
        Ordering::NameAsc => r#" ORDER BY LOWER(name) COLLATE "C" ASC, name COLLATE "C" ASC, id ASC"#,
        Ordering::NameDesc => r#" ORDER BY LOWER(name) COLLATE "C" DESC, name COLLATE "C" DESC, id ASC"#,
    });
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new: NewUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, name, password_hash) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "user profile", "email"))?;
        Ok(user)
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    async fn list_users(&self, query: &ListQuery<UserFilter>) -> Result<Vec<User>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));
        if let Some(name) = &query.filter.name {
            qb.push(" AND name = ").push_bind(name.clone());
        }
        if let Some(email) = &query.filter.email {
            qb.push(" AND email = ").push_bind(email.clone());
        }
        for term in &query.search {
            let pattern = format!("%{}%", escape_like(term));
            qb.push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        push_ordering(&mut qb, query.ordering);

        let rows = qb.build_query_as::<User>().fetch_all(&self.pool).await?;
        debug!(count = rows.len(), "listed users");
        Ok(rows)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET email = COALESCE($2, email),
                   name = COALESCE($3, name),
                   password_hash = COALESCE($4, password_hash)
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.email)
        .bind(changes.name)
        .bind(changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "user profile", "email"))?
        .ok_or(StoreError::NotFound("user"))
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        let done = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn token_for_user(&self, user_id: i64, fresh_key: &str) -> Result<AuthToken> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO auth_tokens (key, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(fresh_key)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let token = sqlx::query_as::<_, AuthToken>(
            "SELECT key, user_id, created_at FROM auth_tokens WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(token)
    }

    async fn user_by_token(&self, key: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.name, u.password_hash, u.created_at
              FROM users u
              JOIN auth_tokens t ON t.user_id = u.id
             WHERE t.key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_planet(&self, new: NewPlanet) -> Result<Planet> {
        let planet = sqlx::query_as::<_, Planet>(&format!(
            r#"
            INSERT INTO planets (name, climate, terrain, movie_appearances)
            VALUES ($1, $2, $3, $4)
            RETURNING {PLANET_COLUMNS}
            "#
        ))
        .bind(&new.name)
        .bind(&new.climate)
        .bind(&new.terrain)
        .bind(new.movie_appearances)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "planet", "name"))?;
        Ok(planet)
    }

    async fn planet_by_id(&self, id: i64) -> Result<Option<Planet>> {
        let planet =
            sqlx::query_as::<_, Planet>(&format!("SELECT {PLANET_COLUMNS} FROM planets WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(planet)
    }

    async fn planet_by_name(&self, name: &str) -> Result<Option<Planet>> {
        let planet =
            sqlx::query_as::<_, Planet>(&format!("SELECT {PLANET_COLUMNS} FROM planets WHERE name = $1"))
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(planet)
    }

    async fn list_planets(&self, query: &ListQuery<PlanetFilter>) -> Result<Vec<Planet>> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {PLANET_COLUMNS} FROM planets WHERE TRUE"));
        let f = &query.filter;
        if let Some(name) = &f.name {
            qb.push(" AND name = ").push_bind(name.clone());
        }
        if let Some(climate) = &f.climate {
            qb.push(" AND climate = ").push_bind(climate.clone());
        }
        if let Some(terrain) = &f.terrain {
            qb.push(" AND terrain = ").push_bind(terrain.clone());
        }
        if let Some(n) = f.movie_appearances {
            qb.push(" AND movie_appearances = ").push_bind(n);
        }
        for term in &query.search {
            qb.push(" AND name ILIKE ")
                .push_bind(format!("{}%", escape_like(term)));
        }
        push_ordering(&mut qb, query.ordering);

        let rows = qb.build_query_as::<Planet>().fetch_all(&self.pool).await?;
        debug!(count = rows.len(), "listed planets");
        Ok(rows)
    }

    async fn update_planet(&self, id: i64, changes: PlanetChanges) -> Result<Planet> {
        sqlx::query_as::<_, Planet>(&format!(
            r#"
            UPDATE planets
               SET name = COALESCE($2, name),
                   climate = COALESCE($3, climate),
                   terrain = COALESCE($4, terrain)
             WHERE id = $1
            RETURNING {PLANET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.climate)
        .bind(changes.terrain)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "planet", "name"))?
        .ok_or(StoreError::NotFound("planet"))
    }

    async fn delete_planet(&self, id: i64) -> Result<bool> {
        let done = sqlx::query("DELETE FROM planets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}
