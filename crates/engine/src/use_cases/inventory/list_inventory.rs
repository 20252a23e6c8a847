//! List a user's inventory.

use std::sync::Arc;

use armory_domain::{Item, UserId};

use crate::infrastructure::ports::{ItemRepo, UserRepo};

use super::error::InventoryError;

pub struct ListInventory {
    user_repo: Arc<dyn UserRepo>,
    item_repo: Arc<dyn ItemRepo>,
}

impl ListInventory {
    pub fn new(user_repo: Arc<dyn UserRepo>, item_repo: Arc<dyn ItemRepo>) -> Self {
        Self {
            user_repo,
            item_repo,
        }
    }

    /// Items owned by `user_id`, equipped or not.
    pub async fn execute(&self, user_id: UserId) -> Result<Vec<Item>, InventoryError> {
        if self.user_repo.get(user_id).await?.is_none() {
            tracing::warn!(user_id = %user_id, "Inventory lookup for unknown user");
            return Err(InventoryError::UserNotFound);
        }
        let items = self.item_repo.list_by_owner(user_id).await?;
        tracing::debug!(user_id = %user_id, items = items.len(), "Inventory loaded");
        Ok(items)
    }
}
