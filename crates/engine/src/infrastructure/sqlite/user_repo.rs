use async_trait::async_trait;
use armory_domain::{Email, User, UserId};
use sqlx::SqlitePool;

use super::db_error;
use crate::infrastructure::ports::{RepoError, UserRepo};

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let row: Option<(i64, String)> = sqlx::query_as("SELECT id, email FROM users WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("user.get"))?;

        row.map(|(id, email)| -> Result<User, RepoError> {
            let email = Email::new(email).map_err(RepoError::serialization)?;
            Ok(User::new(UserId::new(id), email))
        })
        .transpose()
    }

    async fn save(&self, user: &User) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO users (id, email) VALUES (?, ?)
             ON CONFLICT(id) DO UPDATE SET email = excluded.email",
        )
        .bind(user.id.get())
        .bind(user.email.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("user.save"))?;
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await.map_err(db_error("user.delete"))?;

        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("user.delete"))?;
        if exists.is_none() {
            return Err(RepoError::not_found("User", id));
        }

        let (references,): (i64,) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM characters WHERE user_id = ?1)
                  + (SELECT COUNT(*) FROM items WHERE owner_id = ?1)",
        )
        .bind(id.get())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("user.delete"))?;
        if references > 0 {
            return Err(RepoError::constraint(format!(
                "user {id} still owns characters or items"
            )));
        }

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(db_error("user.delete"))?;
        tx.commit().await.map_err(db_error("user.delete"))?;
        Ok(())
    }
}
