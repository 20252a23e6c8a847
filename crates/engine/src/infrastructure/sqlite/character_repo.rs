use async_trait::async_trait;
use armory_domain::{Character, CharacterId, CharacterName, UserId};
use sqlx::SqlitePool;

use super::db_error;
use crate::infrastructure::ports::{CharacterRepo, RepoError};

type CharacterRow = (i64, i64, String, i64, i64);

pub struct SqliteCharacterRepo {
    pool: SqlitePool,
}

impl SqliteCharacterRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row((id, user_id, name, level, health): CharacterRow) -> Result<Character, RepoError> {
        let name = CharacterName::new(name).map_err(RepoError::serialization)?;
        let level = u32::try_from(level).map_err(RepoError::serialization)?;
        let health = u32::try_from(health).map_err(RepoError::serialization)?;
        Character::new(CharacterId::new(id), UserId::new(user_id), name)
            .with_stats(level, health)
            .map_err(RepoError::serialization)
    }
}

#[async_trait]
impl CharacterRepo for SqliteCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        let row: Option<CharacterRow> = sqlx::query_as(
            "SELECT id, user_id, name, level, health FROM characters WHERE id = ?",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("character.get"))?;

        row.map(Self::from_row).transpose()
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        let user: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
            .bind(character.user_id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("character.save"))?;
        if user.is_none() {
            return Err(RepoError::not_found("User", character.user_id));
        }

        sqlx::query(
            "INSERT INTO characters (id, user_id, name, level, health) VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                name = excluded.name,
                level = excluded.level,
                health = excluded.health",
        )
        .bind(character.id.get())
        .bind(character.user_id.get())
        .bind(character.name.as_str())
        .bind(i64::from(character.level))
        .bind(i64::from(character.health))
        .execute(&self.pool)
        .await
        .map_err(db_error("character.save"))?;
        Ok(())
    }

    async fn update(&self, character: &Character) -> Result<(), RepoError> {
        let result = sqlx::query(
            "UPDATE characters SET name = ?, level = ?, health = ? WHERE id = ?",
        )
        .bind(character.name.as_str())
        .bind(i64::from(character.level))
        .bind(i64::from(character.health))
        .bind(character.id.get())
        .execute(&self.pool)
        .await
        .map_err(db_error("character.update"))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Character", character.id));
        }
        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("character.delete"))?;

        sqlx::query("UPDATE items SET character_id = NULL WHERE character_id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(db_error("character.delete"))?;

        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(db_error("character.delete"))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Character", id));
        }

        tx.commit().await.map_err(db_error("character.delete"))?;
        Ok(())
    }
}
