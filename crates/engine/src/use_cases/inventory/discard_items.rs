//! Discard items use case.
//!
//! Removes items from a user's inventory, leaving them unowned.

use std::sync::Arc;

use armory_domain::{Item, ItemId, UserId};

use crate::infrastructure::ports::{ItemRepo, UserRepo};

use super::error::InventoryError;
use super::types::InventoryActionResult;
use super::unique_ids;

pub struct DiscardItems {
    user_repo: Arc<dyn UserRepo>,
    item_repo: Arc<dyn ItemRepo>,
}

impl DiscardItems {
    pub fn new(user_repo: Arc<dyn UserRepo>, item_repo: Arc<dyn ItemRepo>) -> Self {
        Self {
            user_repo,
            item_repo,
        }
    }

    /// Discard every item, or none of them.
    ///
    /// Equipped items must be unequipped first.
    pub async fn execute(
        &self,
        user_id: UserId,
        item_ids: &[ItemId],
    ) -> Result<InventoryActionResult, InventoryError> {
        let ids = unique_ids(item_ids);

        if self.user_repo.get(user_id).await?.is_none() {
            tracing::warn!(user_id = %user_id, "Discard refused: user not found");
            return Err(InventoryError::UserNotFound);
        }

        let owned = self.item_repo.count_owned(user_id, &ids).await?;
        if owned != ids.len() {
            tracing::warn!(
                user_id = %user_id,
                requested = ids.len(),
                owned,
                "Discard refused: items not owned by user"
            );
            return Err(InventoryError::ItemsNotOwnedByUser);
        }

        let items = self.item_repo.get_many(&ids).await?;
        if items.iter().any(Item::is_equipped) {
            tracing::warn!(user_id = %user_id, "Discard refused: items are equipped");
            return Err(InventoryError::ItemsEquippedToCharacter);
        }

        if ids.is_empty() {
            return Ok(InventoryActionResult::new(0));
        }

        let changed = self.item_repo.discard_many(user_id, &ids).await?;
        if changed != ids.len() {
            tracing::warn!(
                user_id = %user_id,
                requested = ids.len(),
                changed,
                "Discard aborted: items changed concurrently"
            );
            return Err(InventoryError::ConcurrentModification);
        }

        tracing::info!(user_id = %user_id, items = changed, "Items discarded");
        Ok(InventoryActionResult::new(changed))
    }
}
