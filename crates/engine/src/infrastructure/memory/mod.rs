//! In-memory storage backend.
//!
//! All repositories share one [`InMemoryStore`]. Every table lives behind a
//! single `RwLock`, so a batch write checks its guard and applies its changes
//! without another request interleaving.

use std::sync::Arc;

use armory_domain::{
    Character, CharacterId, Item, ItemId, ItemType, ItemTypeId, Perk, PerkId, User, UserId,
};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

mod arena;
mod catalog_repo;
mod character_repo;
mod item_repo;
mod user_repo;

pub use arena::Arena;
pub use catalog_repo::MemoryCatalogRepo;
pub use character_repo::MemoryCharacterRepo;
pub use item_repo::MemoryItemRepo;
pub use user_repo::MemoryUserRepo;

#[derive(Debug, Default)]
pub struct Tables {
    pub users: Arena<UserId, User>,
    pub characters: Arena<CharacterId, Character>,
    pub items: Arena<ItemId, Item>,
    pub item_types: Arena<ItemTypeId, ItemType>,
    pub perks: Arena<PerkId, Perk>,
}

/// Injectable in-memory store. Each instance is independent.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

/// Create all in-memory repositories over one shared store.
pub struct InMemoryRepositories {
    pub store: Arc<InMemoryStore>,
    pub user: Arc<MemoryUserRepo>,
    pub character: Arc<MemoryCharacterRepo>,
    pub item: Arc<MemoryItemRepo>,
    pub catalog: Arc<MemoryCatalogRepo>,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()))
    }

    pub fn with_store(store: Arc<InMemoryStore>) -> Self {
        Self {
            user: Arc::new(MemoryUserRepo::new(store.clone())),
            character: Arc::new(MemoryCharacterRepo::new(store.clone())),
            item: Arc::new(MemoryItemRepo::new(store.clone())),
            catalog: Arc::new(MemoryCatalogRepo::new(store.clone())),
            store,
        }
    }
}

impl Default for InMemoryRepositories {
    fn default() -> Self {
        Self::new()
    }
}
