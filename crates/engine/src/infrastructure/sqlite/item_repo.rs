use std::collections::HashMap;

use async_trait::async_trait;
use armory_domain::{CharacterId, Item, ItemId, ItemName, ItemTypeId, PerkId, UserId};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{db_error, push_id_list};
use crate::infrastructure::ports::{ItemRepo, RepoError};

/// id, name, item_type_id, owner_id, character_id
type ItemRow = (i64, String, i64, Option<i64>, Option<i64>);

const SELECT_ITEMS: &str = "SELECT id, name, item_type_id, owner_id, character_id FROM items";

pub struct SqliteItemRepo {
    pool: SqlitePool,
}

impl SqliteItemRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(
        (id, name, item_type_id, owner_id, character_id): ItemRow,
        perks: Vec<PerkId>,
    ) -> Result<Item, RepoError> {
        let name = ItemName::new(name).map_err(RepoError::serialization)?;
        let mut item = Item::new(ItemId::new(id), name, ItemTypeId::new(item_type_id))
            .with_perks(perks);
        item.owner_id = owner_id.map(UserId::new);
        item.character_id = character_id.map(CharacterId::new);
        Ok(item)
    }

    /// Attach perks to fetched rows.
    async fn hydrate(&self, rows: Vec<ItemRow>) -> Result<Vec<Item>, RepoError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder =
            QueryBuilder::<Sqlite>::new("SELECT item_id, perk_id FROM item_perks WHERE item_id IN ");
        push_id_list(&mut builder, rows.iter().map(|row| row.0));
        builder.push(" ORDER BY item_id, perk_id");
        let perk_rows: Vec<(i64, i64)> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("item.perks"))?;

        let mut perks: HashMap<i64, Vec<PerkId>> = HashMap::new();
        for (item_id, perk_id) in perk_rows {
            perks.entry(item_id).or_default().push(PerkId::new(perk_id));
        }

        rows.into_iter()
            .map(|row| {
                let item_perks = perks.remove(&row.0).unwrap_or_default();
                Self::from_row(row, item_perks)
            })
            .collect()
    }

    async fn exists(&self, id: ItemId) -> Result<bool, RepoError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM items WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("item.exists"))?;
        Ok(row.is_some())
    }

    /// Finish `builder` with the id list and run it in a transaction that
    /// commits only if every id was changed.
    async fn guarded_update(
        &self,
        operation: &'static str,
        mut builder: QueryBuilder<'_, Sqlite>,
        ids: &[ItemId],
    ) -> Result<usize, RepoError> {
        if ids.is_empty() {
            return Ok(0);
        }
        push_id_list(&mut builder, ids.iter().map(|id| id.get()));

        let mut tx = self.pool.begin().await.map_err(db_error(operation))?;
        let result = builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(db_error(operation))?;

        if result.rows_affected() != ids.len() as u64 {
            tracing::debug!(
                operation,
                requested = ids.len(),
                matched = result.rows_affected(),
                "Guard failed, rolling back"
            );
            tx.rollback().await.map_err(db_error(operation))?;
            return Ok(0);
        }

        tx.commit().await.map_err(db_error(operation))?;
        Ok(ids.len())
    }
}

#[async_trait]
impl ItemRepo for SqliteItemRepo {
    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepoError> {
        let row: Option<ItemRow> = sqlx::query_as(&format!("{SELECT_ITEMS} WHERE id = ?"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("item.get"))?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn save(&self, item: &Item) -> Result<(), RepoError> {
        if item.character_id.is_some() && item.owner_id.is_none() {
            return Err(RepoError::constraint(format!(
                "item {} is equipped but has no owner",
                item.id
            )));
        }

        let mut tx = self.pool.begin().await.map_err(db_error("item.save"))?;

        if let Some(owner) = item.owner_id {
            let user: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
                .bind(owner.get())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("item.save"))?;
            if user.is_none() {
                return Err(RepoError::not_found("User", owner));
            }
        }
        if let Some(character) = item.character_id {
            let holder: Option<(i64,)> =
                sqlx::query_as("SELECT user_id FROM characters WHERE id = ?")
                    .bind(character.get())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(db_error("item.save"))?;
            let Some((holder,)) = holder else {
                return Err(RepoError::not_found("Character", character));
            };
            if item.owner_id.map(UserId::get) != Some(holder) {
                return Err(RepoError::constraint(format!(
                    "item {} cannot be equipped to character {character} of another user",
                    item.id
                )));
            }
        }

        sqlx::query(
            "INSERT INTO items (id, name, item_type_id, owner_id, character_id)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                item_type_id = excluded.item_type_id,
                owner_id = excluded.owner_id,
                character_id = excluded.character_id",
        )
        .bind(item.id.get())
        .bind(item.name.as_str())
        .bind(item.item_type_id.get())
        .bind(item.owner_id.map(UserId::get))
        .bind(item.character_id.map(CharacterId::get))
        .execute(&mut *tx)
        .await
        .map_err(db_error("item.save"))?;

        sqlx::query("DELETE FROM item_perks WHERE item_id = ?")
            .bind(item.id.get())
            .execute(&mut *tx)
            .await
            .map_err(db_error("item.save"))?;
        for perk in &item.perks {
            sqlx::query("INSERT OR IGNORE INTO item_perks (item_id, perk_id) VALUES (?, ?)")
                .bind(item.id.get())
                .bind(perk.get())
                .execute(&mut *tx)
                .await
                .map_err(db_error("item.save"))?;
        }

        tx.commit().await.map_err(db_error("item.save"))?;
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> Result<(), RepoError> {
        let mut tx = self.pool.begin().await.map_err(db_error("item.delete"))?;
        sqlx::query("DELETE FROM item_perks WHERE item_id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(db_error("item.delete"))?;
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(db_error("item.delete"))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Item", id));
        }
        tx.commit().await.map_err(db_error("item.delete"))?;
        Ok(())
    }

    async fn get_many(&self, ids: &[ItemId]) -> Result<Vec<Item>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_ITEMS);
        builder.push(" WHERE id IN ");
        push_id_list(&mut builder, ids.iter().map(|id| id.get()));
        let rows: Vec<ItemRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("item.get_many"))?;

        self.hydrate(rows).await
    }

    async fn count_owned(&self, owner: UserId, ids: &[ItemId]) -> Result<usize, RepoError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM items WHERE owner_id = ");
        builder.push_bind(owner.get());
        builder.push(" AND id IN ");
        push_id_list(&mut builder, ids.iter().map(|id| id.get()));
        let (count,): (i64,) = builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("item.count_owned"))?;

        usize::try_from(count).map_err(|e| RepoError::database("item.count_owned", e))
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Item>, RepoError> {
        let rows: Vec<ItemRow> =
            sqlx::query_as(&format!("{SELECT_ITEMS} WHERE owner_id = ? ORDER BY id"))
                .bind(owner.get())
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("item.list_by_owner"))?;

        self.hydrate(rows).await
    }

    async fn update_character_id(
        &self,
        id: ItemId,
        character_id: Option<CharacterId>,
    ) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("item.update_character_id"))?;

        if let Some(character) = character_id {
            let holder: Option<(i64,)> =
                sqlx::query_as("SELECT user_id FROM characters WHERE id = ?")
                    .bind(character.get())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(db_error("item.update_character_id"))?;
            let Some((holder,)) = holder else {
                return Err(RepoError::not_found("Character", character));
            };
            let owner: Option<(Option<i64>,)> =
                sqlx::query_as("SELECT owner_id FROM items WHERE id = ?")
                    .bind(id.get())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(db_error("item.update_character_id"))?;
            match owner {
                None => return Err(RepoError::not_found("Item", id)),
                Some((None,)) => {
                    return Err(RepoError::constraint(format!(
                        "item {id} has no owner and cannot be equipped"
                    )))
                }
                Some((Some(owner),)) if owner != holder => {
                    return Err(RepoError::constraint(format!(
                        "item {id} cannot be equipped to character {character} of another user"
                    )))
                }
                Some(_) => {}
            }
        }

        let result = sqlx::query("UPDATE items SET character_id = ? WHERE id = ?")
            .bind(character_id.map(CharacterId::get))
            .bind(id.get())
            .execute(&mut *tx)
            .await
            .map_err(db_error("item.update_character_id"))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Item", id));
        }

        tx.commit()
            .await
            .map_err(db_error("item.update_character_id"))?;
        Ok(())
    }

    async fn discard(&self, id: ItemId) -> Result<(), RepoError> {
        let result =
            sqlx::query("UPDATE items SET owner_id = NULL WHERE id = ? AND character_id IS NULL")
                .bind(id.get())
                .execute(&self.pool)
                .await
                .map_err(db_error("item.discard"))?;

        if result.rows_affected() == 0 {
            if self.exists(id).await? {
                return Err(RepoError::constraint(format!(
                    "item {id} is equipped and cannot be discarded"
                )));
            }
            return Err(RepoError::not_found("Item", id));
        }
        Ok(())
    }

    async fn clear_character(&self, id: ItemId) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE items SET character_id = NULL WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(db_error("item.clear_character"))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Item", id));
        }
        Ok(())
    }

    async fn transfer(
        &self,
        source: UserId,
        target: UserId,
        ids: &[ItemId],
    ) -> Result<usize, RepoError> {
        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE items SET owner_id = ");
        builder.push_bind(target.get());
        builder.push(" WHERE owner_id = ");
        builder.push_bind(source.get());
        builder.push(" AND character_id IS NULL AND id IN ");
        self.guarded_update("item.transfer", builder, ids).await
    }

    async fn discard_many(&self, owner: UserId, ids: &[ItemId]) -> Result<usize, RepoError> {
        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE items SET owner_id = NULL WHERE owner_id = ");
        builder.push_bind(owner.get());
        builder.push(" AND character_id IS NULL AND id IN ");
        self.guarded_update("item.discard_many", builder, ids).await
    }

    async fn equip_many(
        &self,
        owner: UserId,
        character: CharacterId,
        ids: &[ItemId],
    ) -> Result<usize, RepoError> {
        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE items SET character_id = ");
        builder.push_bind(character.get());
        builder.push(" WHERE owner_id = ");
        builder.push_bind(owner.get());
        builder.push(" AND character_id IS NULL AND id IN ");
        self.guarded_update("item.equip_many", builder, ids).await
    }

    async fn unequip_many(
        &self,
        owner: UserId,
        character: CharacterId,
        ids: &[ItemId],
    ) -> Result<usize, RepoError> {
        let mut builder =
            QueryBuilder::<Sqlite>::new("UPDATE items SET character_id = NULL WHERE owner_id = ");
        builder.push_bind(owner.get());
        builder.push(" AND character_id = ");
        builder.push_bind(character.get());
        builder.push(" AND id IN ");
        self.guarded_update("item.unequip_many", builder, ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{CharacterRepo, UserRepo};
    use crate::infrastructure::sqlite::{test_repositories, SqliteRepositories};
    use armory_domain::{Character, CharacterName, Email, User};

    const ALICE: UserId = UserId::new(1);
    const BOB: UserId = UserId::new(2);
    const HERO: CharacterId = CharacterId::new(1);

    async fn seeded() -> SqliteRepositories {
        let repos = test_repositories().await;
        for (id, email) in [(ALICE, "alice@example.com"), (BOB, "bob@example.com")] {
            repos
                .user
                .save(&User::new(id, Email::new(email).unwrap()))
                .await
                .unwrap();
        }
        repos
            .character
            .save(&Character::new(HERO, ALICE, CharacterName::new("Hero").unwrap()))
            .await
            .unwrap();
        for id in 1..=3 {
            let item = Item::new(
                ItemId::new(id),
                ItemName::new(format!("Item {id}")).unwrap(),
                ItemTypeId::new(1),
            )
            .with_owner(ALICE);
            repos.item.save(&item).await.unwrap();
        }
        repos
    }

    fn ids(raw: &[i64]) -> Vec<ItemId> {
        raw.iter().copied().map(ItemId::new).collect()
    }

    #[tokio::test]
    async fn perks_survive_save_and_get() {
        let repos = seeded().await;
        let sword = Item::new(ItemId::new(10), ItemName::new("Sword").unwrap(), ItemTypeId::new(1))
            .with_owner(ALICE)
            .with_perks(vec![PerkId::new(2), PerkId::new(1)]);
        repos.item.save(&sword).await.unwrap();

        let found = repos.item.get(ItemId::new(10)).await.unwrap().unwrap();
        assert_eq!(found.perks, vec![PerkId::new(1), PerkId::new(2)]);
        assert_eq!(found.owner_id, Some(ALICE));
    }

    #[tokio::test]
    async fn save_rejects_unknown_owner() {
        let repos = seeded().await;
        let orphan = Item::new(ItemId::new(10), ItemName::new("Orb").unwrap(), ItemTypeId::new(1))
            .with_owner(UserId::new(99));
        let result = repos.item.save(&orphan).await;
        assert!(matches!(result, Err(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn count_owned_and_get_many() {
        let repos = seeded().await;
        assert_eq!(repos.item.count_owned(ALICE, &ids(&[1, 2, 99])).await.unwrap(), 2);
        assert_eq!(repos.item.count_owned(BOB, &ids(&[1])).await.unwrap(), 0);
        assert_eq!(repos.item.get_many(&ids(&[1, 99, 3])).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn transfer_moves_all_items() {
        let repos = seeded().await;
        assert_eq!(repos.item.transfer(ALICE, BOB, &ids(&[1, 2])).await.unwrap(), 2);
        assert_eq!(repos.item.list_by_owner(BOB).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn transfer_rolls_back_when_one_item_is_equipped() {
        let repos = seeded().await;
        repos.item.update_character_id(ItemId::new(2), Some(HERO)).await.unwrap();

        assert_eq!(repos.item.transfer(ALICE, BOB, &ids(&[1, 2])).await.unwrap(), 0);
        let first = repos.item.get(ItemId::new(1)).await.unwrap().unwrap();
        assert_eq!(first.owner_id, Some(ALICE));
    }

    #[tokio::test]
    async fn equip_then_unequip() {
        let repos = seeded().await;
        assert_eq!(repos.item.equip_many(ALICE, HERO, &ids(&[1, 2])).await.unwrap(), 2);
        assert_eq!(repos.item.equip_many(ALICE, HERO, &ids(&[2, 3])).await.unwrap(), 0);
        assert_eq!(repos.item.unequip_many(ALICE, HERO, &ids(&[1, 2])).await.unwrap(), 2);

        let first = repos.item.get(ItemId::new(1)).await.unwrap().unwrap();
        assert_eq!(first.character_id, None);
        assert_eq!(first.owner_id, Some(ALICE));
    }

    #[tokio::test]
    async fn discard_many_clears_owner() {
        let repos = seeded().await;
        assert_eq!(repos.item.discard_many(ALICE, &ids(&[1, 3])).await.unwrap(), 2);
        assert_eq!(repos.item.list_by_owner(ALICE).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn single_item_state_changes() {
        let repos = seeded().await;
        repos.item.update_character_id(ItemId::new(1), Some(HERO)).await.unwrap();
        let discard = repos.item.discard(ItemId::new(1)).await;
        assert!(matches!(discard, Err(RepoError::ConstraintViolation(_))));

        repos.item.clear_character(ItemId::new(1)).await.unwrap();
        repos.item.discard(ItemId::new(1)).await.unwrap();

        let equip_unowned = repos.item.update_character_id(ItemId::new(1), Some(HERO)).await;
        assert!(matches!(equip_unowned, Err(RepoError::ConstraintViolation(_))));

        let missing = repos.item.discard(ItemId::new(99)).await;
        assert!(matches!(missing, Err(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn id_lists_beyond_the_variable_limit_are_accepted() {
        let repos = seeded().await;
        let many: Vec<ItemId> = (1..=40_000).map(ItemId::new).collect();

        assert_eq!(repos.item.count_owned(ALICE, &many).await.unwrap(), 3);
        assert_eq!(repos.item.get_many(&many).await.unwrap().len(), 3);
        // Most ids do not exist, so the guard fails and nothing moves.
        assert_eq!(repos.item.transfer(ALICE, BOB, &many).await.unwrap(), 0);
        assert_eq!(repos.item.discard_many(ALICE, &many).await.unwrap(), 0);
        assert_eq!(repos.item.list_by_owner(ALICE).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn character_of_another_user_cannot_hold_the_item() {
        let repos = seeded().await;
        let rival = CharacterId::new(2);
        repos
            .character
            .save(&Character::new(rival, BOB, CharacterName::new("Rival").unwrap()))
            .await
            .unwrap();

        let mut orb = Item::new(ItemId::new(10), ItemName::new("Orb").unwrap(), ItemTypeId::new(1))
            .with_owner(ALICE);
        orb.character_id = Some(rival);
        let saved = repos.item.save(&orb).await;
        assert!(matches!(saved, Err(RepoError::ConstraintViolation(_))));

        let equipped = repos.item.update_character_id(ItemId::new(1), Some(rival)).await;
        assert!(matches!(equipped, Err(RepoError::ConstraintViolation(_))));
        let first = repos.item.get(ItemId::new(1)).await.unwrap().unwrap();
        assert_eq!(first.character_id, None);

        let missing = repos
            .item
            .update_character_id(ItemId::new(1), Some(CharacterId::new(99)))
            .await;
        assert!(matches!(missing, Err(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn delete_removes_item_and_perks() {
        let repos = seeded().await;
        repos.item.delete(ItemId::new(1)).await.unwrap();
        assert!(repos.item.get(ItemId::new(1)).await.unwrap().is_none());
        let again = repos.item.delete(ItemId::new(1)).await;
        assert!(matches!(again, Err(ref e) if e.is_not_found()));
    }
}
