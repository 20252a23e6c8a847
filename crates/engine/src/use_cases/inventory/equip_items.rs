//! Equip items use case.
//!
//! Puts items from a user's inventory onto one of the user's characters.

use std::sync::Arc;

use armory_domain::{CharacterId, Item, ItemId, UserId};

use crate::infrastructure::ports::{CharacterRepo, ItemRepo};

use super::error::InventoryError;
use super::types::InventoryActionResult;
use super::unique_ids;

/// Equip items use case.
///
/// Orchestrates: character lookup and ownership, item ownership, equip state,
/// one guarded batch write.
pub struct EquipItems {
    character_repo: Arc<dyn CharacterRepo>,
    item_repo: Arc<dyn ItemRepo>,
}

impl EquipItems {
    pub fn new(character_repo: Arc<dyn CharacterRepo>, item_repo: Arc<dyn ItemRepo>) -> Self {
        Self {
            character_repo,
            item_repo,
        }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        character_id: CharacterId,
        item_ids: &[ItemId],
    ) -> Result<InventoryActionResult, InventoryError> {
        let ids = unique_ids(item_ids);

        let Some(character) = self.character_repo.get(character_id).await? else {
            tracing::warn!(character_id = %character_id, "Equip refused: character not found");
            return Err(InventoryError::CharacterNotFound);
        };
        if !character.is_owned_by(user_id) {
            tracing::warn!(
                user_id = %user_id,
                character_id = %character_id,
                owner_id = %character.user_id,
                "Equip refused: character belongs to another user"
            );
            return Err(InventoryError::CharacterNotOwnedByUser);
        }

        let items = self.item_repo.get_many(&ids).await?;
        let owned = items.iter().filter(|item| item.is_owned_by(user_id)).count();
        if owned != ids.len() {
            tracing::warn!(
                user_id = %user_id,
                requested = ids.len(),
                owned,
                "Equip refused: items not owned by user"
            );
            return Err(InventoryError::ItemsNotOwnedByUser);
        }
        if items.iter().any(Item::is_equipped) {
            tracing::warn!(user_id = %user_id, "Equip refused: items already equipped");
            return Err(InventoryError::ItemsAlreadyEquipped);
        }

        if ids.is_empty() {
            return Ok(InventoryActionResult::new(0));
        }

        let changed = self
            .item_repo
            .equip_many(user_id, character_id, &ids)
            .await?;
        if changed != ids.len() {
            tracing::warn!(
                character_id = %character_id,
                requested = ids.len(),
                changed,
                "Equip aborted: items changed concurrently"
            );
            return Err(InventoryError::ConcurrentModification);
        }

        tracing::info!(
            user_id = %user_id,
            character_id = %character_id,
            items = changed,
            "Items equipped"
        );
        Ok(InventoryActionResult::new(changed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockCharacterRepo, MockItemRepo};
    use crate::use_cases::inventory::test_support::{character, equipped_item, owned_item};

    const ALICE: UserId = UserId::new(1);
    const BOB: UserId = UserId::new(2);
    const HERO: CharacterId = CharacterId::new(10);

    fn hero_of_alice() -> MockCharacterRepo {
        let mut character_repo = MockCharacterRepo::new();
        character_repo
            .expect_get()
            .withf(|id| *id == HERO)
            .returning(|id| Ok(Some(character(id.get(), ALICE))));
        character_repo
    }

    #[tokio::test]
    async fn when_character_missing_returns_error() {
        let mut character_repo = MockCharacterRepo::new();
        character_repo.expect_get().returning(|_| Ok(None));

        let use_case = EquipItems::new(Arc::new(character_repo), Arc::new(MockItemRepo::new()));
        let result = use_case.execute(ALICE, HERO, &[ItemId::new(1)]).await;

        assert!(matches!(result, Err(InventoryError::CharacterNotFound)));
    }

    #[tokio::test]
    async fn when_character_belongs_to_someone_else_returns_error() {
        let use_case = EquipItems::new(Arc::new(hero_of_alice()), Arc::new(MockItemRepo::new()));
        let result = use_case.execute(BOB, HERO, &[ItemId::new(1)]).await;

        assert!(matches!(result, Err(InventoryError::CharacterNotOwnedByUser)));
    }

    #[tokio::test]
    async fn when_item_missing_or_foreign_returns_error() {
        let mut item_repo = MockItemRepo::new();
        // Item 2 does not exist, item 3 belongs to Bob.
        item_repo
            .expect_get_many()
            .returning(|_| Ok(vec![owned_item(1, ALICE), owned_item(3, BOB)]));
        item_repo.expect_equip_many().never();

        let use_case = EquipItems::new(Arc::new(hero_of_alice()), Arc::new(item_repo));
        let result = use_case
            .execute(ALICE, HERO, &[ItemId::new(1), ItemId::new(2), ItemId::new(3)])
            .await;

        assert!(matches!(result, Err(InventoryError::ItemsNotOwnedByUser)));
    }

    #[tokio::test]
    async fn when_item_already_equipped_returns_error() {
        let mut item_repo = MockItemRepo::new();
        item_repo
            .expect_get_many()
            .returning(|_| Ok(vec![owned_item(1, ALICE), equipped_item(2, ALICE, 11)]));
        item_repo.expect_equip_many().never();

        let use_case = EquipItems::new(Arc::new(hero_of_alice()), Arc::new(item_repo));
        let result = use_case
            .execute(ALICE, HERO, &[ItemId::new(1), ItemId::new(2)])
            .await;

        assert!(matches!(result, Err(InventoryError::ItemsAlreadyEquipped)));
    }

    #[tokio::test]
    async fn when_guarded_write_falls_short_reports_concurrent_modification() {
        let mut item_repo = MockItemRepo::new();
        item_repo
            .expect_get_many()
            .returning(|_| Ok(vec![owned_item(1, ALICE)]));
        item_repo.expect_equip_many().returning(|_, _, _| Ok(0));

        let use_case = EquipItems::new(Arc::new(hero_of_alice()), Arc::new(item_repo));
        let result = use_case.execute(ALICE, HERO, &[ItemId::new(1)]).await;

        assert!(matches!(result, Err(InventoryError::ConcurrentModification)));
    }

    #[tokio::test]
    async fn when_valid_equips_every_item() {
        let mut item_repo = MockItemRepo::new();
        item_repo
            .expect_get_many()
            .returning(|_| Ok(vec![owned_item(1, ALICE), owned_item(2, ALICE)]));
        item_repo
            .expect_equip_many()
            .withf(|owner, character, ids| *owner == ALICE && *character == HERO && ids.len() == 2)
            .times(1)
            .returning(|_, _, ids| Ok(ids.len()));

        let use_case = EquipItems::new(Arc::new(hero_of_alice()), Arc::new(item_repo));
        let result = use_case
            .execute(ALICE, HERO, &[ItemId::new(1), ItemId::new(2)])
            .await
            .unwrap();

        assert_eq!(result.items_affected, 2);
    }
}
