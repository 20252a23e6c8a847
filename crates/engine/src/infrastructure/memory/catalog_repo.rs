//! In-memory catalog (item types and perks).

use std::sync::Arc;

use async_trait::async_trait;
use armory_domain::{ItemType, ItemTypeId, Perk, PerkId};

use super::InMemoryStore;
use crate::infrastructure::ports::{CatalogRepo, RepoError};

pub struct MemoryCatalogRepo {
    store: Arc<InMemoryStore>,
}

impl MemoryCatalogRepo {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CatalogRepo for MemoryCatalogRepo {
    async fn save_item_type(&self, item_type: &ItemType) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .item_types
            .insert(item_type.id, item_type.clone());
        Ok(())
    }

    async fn save_perk(&self, perk: &Perk) -> Result<(), RepoError> {
        self.store.write().await.perks.insert(perk.id, perk.clone());
        Ok(())
    }

    async fn get_item_type(&self, id: ItemTypeId) -> Result<Option<ItemType>, RepoError> {
        Ok(self.store.read().await.item_types.get(id).cloned())
    }

    async fn get_perk(&self, id: PerkId) -> Result<Option<Perk>, RepoError> {
        Ok(self.store.read().await.perks.get(id).cloned())
    }
}
