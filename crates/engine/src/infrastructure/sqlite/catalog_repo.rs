use async_trait::async_trait;
use armory_domain::{ItemType, ItemTypeId, Perk, PerkId};
use sqlx::SqlitePool;

use super::db_error;
use crate::infrastructure::ports::{CatalogRepo, RepoError};

pub struct SqliteCatalogRepo {
    pool: SqlitePool,
}

impl SqliteCatalogRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepo for SqliteCatalogRepo {
    async fn save_item_type(&self, item_type: &ItemType) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO item_types (id, name) VALUES (?, ?)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
        )
        .bind(item_type.id.get())
        .bind(&item_type.name)
        .execute(&self.pool)
        .await
        .map_err(db_error("catalog.save_item_type"))?;
        Ok(())
    }

    async fn save_perk(&self, perk: &Perk) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO perks (id, name, effect) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name, effect = excluded.effect",
        )
        .bind(perk.id.get())
        .bind(&perk.name)
        .bind(&perk.effect)
        .execute(&self.pool)
        .await
        .map_err(db_error("catalog.save_perk"))?;
        Ok(())
    }

    async fn get_item_type(&self, id: ItemTypeId) -> Result<Option<ItemType>, RepoError> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM item_types WHERE id = ?")
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("catalog.get_item_type"))?;

        Ok(row.map(|(id, name)| ItemType::new(ItemTypeId::new(id), name)))
    }

    async fn get_perk(&self, id: PerkId) -> Result<Option<Perk>, RepoError> {
        let row: Option<(i64, String, String)> =
            sqlx::query_as("SELECT id, name, effect FROM perks WHERE id = ?")
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("catalog.get_perk"))?;

        Ok(row.map(|(id, name, effect)| Perk::new(PerkId::new(id), name, effect)))
    }
}
