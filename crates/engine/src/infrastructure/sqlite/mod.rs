//! SQLite storage backend.
//!
//! Guarded batch writes run inside a transaction and roll back unless every
//! requested row was changed.

use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::infrastructure::ports::RepoError;

mod catalog_repo;
mod character_repo;
mod item_repo;
mod user_repo;

pub use catalog_repo::SqliteCatalogRepo;
pub use character_repo::SqliteCharacterRepo;
pub use item_repo::SqliteItemRepo;
pub use user_repo::SqliteUserRepo;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        email TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS characters (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id),
        name TEXT NOT NULL,
        level INTEGER NOT NULL,
        health INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS item_types (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS perks (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        effect TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        item_type_id INTEGER NOT NULL,
        owner_id INTEGER REFERENCES users(id),
        character_id INTEGER REFERENCES characters(id),
        CHECK (character_id IS NULL OR owner_id IS NOT NULL)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS item_perks (
        item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
        perk_id INTEGER NOT NULL,
        PRIMARY KEY (item_id, perk_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_items_owner ON items(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_items_character ON items(character_id)",
];

/// All SQLite repositories over one connection pool.
pub struct SqliteRepositories {
    pub pool: SqlitePool,
    pub user: Arc<SqliteUserRepo>,
    pub character: Arc<SqliteCharacterRepo>,
    pub item: Arc<SqliteItemRepo>,
    pub catalog: Arc<SqliteCatalogRepo>,
}

impl SqliteRepositories {
    /// Open (creating if missing) the database at `url` and apply the schema.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        tracing::debug!("SQLite schema ready");

        Ok(Self {
            user: Arc::new(SqliteUserRepo::new(pool.clone())),
            character: Arc::new(SqliteCharacterRepo::new(pool.clone())),
            item: Arc::new(SqliteItemRepo::new(pool.clone())),
            catalog: Arc::new(SqliteCatalogRepo::new(pool.clone())),
            pool,
        })
    }
}

/// Map a sqlx error, turning unique and foreign-key failures into
/// `ConstraintViolation`.
pub(crate) fn db_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> RepoError {
    move |err| {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() || db.is_foreign_key_violation() || db.is_check_violation()
            {
                return RepoError::constraint(db.message());
            }
        }
        RepoError::database(operation, err)
    }
}

/// Append `(SELECT value FROM json_each(?))` binding the ids as one JSON
/// array, so the list length is not bounded by SQLite's variable limit.
pub(crate) fn push_id_list(
    builder: &mut QueryBuilder<'_, Sqlite>,
    ids: impl IntoIterator<Item = i64>,
) {
    let ids: Vec<i64> = ids.into_iter().collect();
    builder.push("(SELECT value FROM json_each(");
    builder.push_bind(serde_json::Value::from(ids).to_string());
    builder.push("))");
}

#[cfg(test)]
pub(crate) async fn test_repositories() -> SqliteRepositories {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    // One connection: every in-memory connection is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    SqliteRepositories::with_pool(pool).await.unwrap()
}
