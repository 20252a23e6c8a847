//! Inventory use cases.
//!
//! The ownership rules for moving items between users, onto characters and
//! out of inventories. Each operation checks its preconditions in a fixed
//! order, then issues one guarded batch write that changes every item or none.

use std::collections::HashSet;
use std::sync::Arc;

use armory_domain::{CharacterId, Item, ItemId, UserId};

use crate::infrastructure::ports::{CharacterRepo, ItemRepo, UserRepo};

mod discard_items;
mod equip_items;
mod error;
mod list_inventory;
mod transfer_items;
mod types;
mod unequip_items;

#[cfg(test)]
pub(crate) mod test_support;

pub use discard_items::DiscardItems;
pub use equip_items::EquipItems;
pub use error::InventoryError;
pub use list_inventory::ListInventory;
pub use transfer_items::TransferItems;
pub use types::InventoryActionResult;
pub use unequip_items::UnequipItems;

/// Drop repeated ids, keeping the first occurrence order.
fn unique_ids(ids: &[ItemId]) -> Vec<ItemId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// User-inventory operations.
pub struct ItemService {
    transfer: TransferItems,
    discard: DiscardItems,
    list: ListInventory,
}

impl ItemService {
    pub fn new(user_repo: Arc<dyn UserRepo>, item_repo: Arc<dyn ItemRepo>) -> Self {
        Self {
            transfer: TransferItems::new(user_repo.clone(), item_repo.clone()),
            discard: DiscardItems::new(user_repo.clone(), item_repo.clone()),
            list: ListInventory::new(user_repo, item_repo),
        }
    }

    pub async fn transfer_items(
        &self,
        source: UserId,
        target: UserId,
        item_ids: &[ItemId],
    ) -> Result<InventoryActionResult, InventoryError> {
        self.transfer.execute(source, target, item_ids).await
    }

    pub async fn discard_many(
        &self,
        user_id: UserId,
        item_ids: &[ItemId],
    ) -> Result<InventoryActionResult, InventoryError> {
        self.discard.execute(user_id, item_ids).await
    }

    pub async fn inventory(&self, user_id: UserId) -> Result<Vec<Item>, InventoryError> {
        self.list.execute(user_id).await
    }
}

/// Character equipment operations.
pub struct CharacterService {
    equip: EquipItems,
    unequip: UnequipItems,
}

impl CharacterService {
    pub fn new(character_repo: Arc<dyn CharacterRepo>, item_repo: Arc<dyn ItemRepo>) -> Self {
        Self {
            equip: EquipItems::new(character_repo.clone(), item_repo.clone()),
            unequip: UnequipItems::new(character_repo, item_repo),
        }
    }

    pub async fn equip(
        &self,
        user_id: UserId,
        character_id: CharacterId,
        item_ids: &[ItemId],
    ) -> Result<InventoryActionResult, InventoryError> {
        self.equip.execute(user_id, character_id, item_ids).await
    }

    /// Unequip items from the character; they remain in the user's inventory.
    pub async fn discard_items(
        &self,
        user_id: UserId,
        character_id: CharacterId,
        item_ids: &[ItemId],
    ) -> Result<InventoryActionResult, InventoryError> {
        self.unequip.execute(user_id, character_id, item_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_ids_keeps_first_occurrence_order() {
        let ids = [3, 1, 3, 2, 1].map(ItemId::new);
        assert_eq!(unique_ids(&ids), [3, 1, 2].map(ItemId::new).to_vec());
        assert!(unique_ids(&[]).is_empty());
    }
}
