//! Unequip items use case.
//!
//! Takes items off a character. The items stay in the owner's inventory.

use std::sync::Arc;

use armory_domain::{CharacterId, ItemId, UserId};

use crate::infrastructure::ports::{CharacterRepo, ItemRepo};

use super::error::InventoryError;
use super::types::InventoryActionResult;
use super::unique_ids;

pub struct UnequipItems {
    character_repo: Arc<dyn CharacterRepo>,
    item_repo: Arc<dyn ItemRepo>,
}

impl UnequipItems {
    pub fn new(character_repo: Arc<dyn CharacterRepo>, item_repo: Arc<dyn ItemRepo>) -> Self {
        Self {
            character_repo,
            item_repo,
        }
    }

    /// Every item must be owned by `user_id` and equipped to `character_id`.
    pub async fn execute(
        &self,
        user_id: UserId,
        character_id: CharacterId,
        item_ids: &[ItemId],
    ) -> Result<InventoryActionResult, InventoryError> {
        let ids = unique_ids(item_ids);

        let Some(character) = self.character_repo.get(character_id).await? else {
            tracing::warn!(character_id = %character_id, "Unequip refused: character not found");
            return Err(InventoryError::CharacterNotFound);
        };
        if !character.is_owned_by(user_id) {
            tracing::warn!(
                user_id = %user_id,
                character_id = %character_id,
                "Unequip refused: character belongs to another user"
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
                "Unequip refused: items not owned by user"
            );
            return Err(InventoryError::ItemsNotOwnedByUser);
        }
        if !items.iter().all(|item| item.is_equipped_to(character_id)) {
            tracing::warn!(
                character_id = %character_id,
                "Unequip refused: items not equipped to character"
            );
            return Err(InventoryError::ItemsNotEquippedToCharacter);
        }

        if ids.is_empty() {
            return Ok(InventoryActionResult::new(0));
        }

        let changed = self
            .item_repo
            .unequip_many(user_id, character_id, &ids)
            .await?;
        if changed != ids.len() {
            tracing::warn!(
                character_id = %character_id,
                requested = ids.len(),
                changed,
                "Unequip aborted: items changed concurrently"
            );
            return Err(InventoryError::ConcurrentModification);
        }

        tracing::info!(
            user_id = %user_id,
            character_id = %character_id,
            items = changed,
            "Items unequipped"
        );
        Ok(InventoryActionResult::new(changed))
    }
}
