//! Repository port traits for database access.

use async_trait::async_trait;
use armory_domain::*;

use super::error::RepoError;

// =============================================================================
// Database Ports (one per entity type)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// `Ok(None)` for unknown ids; never `NotFound`.
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError>;
    async fn save(&self, user: &User) -> Result<(), RepoError>;
    /// Fails with `ConstraintViolation` while characters or items still
    /// reference the user.
    async fn delete(&self, id: UserId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    // CRUD
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
    async fn update(&self, character: &Character) -> Result<(), RepoError>;
    /// Unequips every item the character holds, then removes it.
    async fn delete(&self, id: CharacterId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepo: Send + Sync {
    // CRUD
    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepoError>;
    async fn save(&self, item: &Item) -> Result<(), RepoError>;
    async fn delete(&self, id: ItemId) -> Result<(), RepoError>;

    // Queries
    /// The subset of `ids` that exist, in no particular order.
    async fn get_many(&self, ids: &[ItemId]) -> Result<Vec<Item>, RepoError>;
    /// How many of `ids` are owned by `owner`.
    async fn count_owned(&self, owner: UserId, ids: &[ItemId]) -> Result<usize, RepoError>;
    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Item>, RepoError>;

    // Single-item state changes
    async fn update_character_id(
        &self,
        id: ItemId,
        character_id: Option<CharacterId>,
    ) -> Result<(), RepoError>;
    /// Clear the owner (remove from inventory).
    async fn discard(&self, id: ItemId) -> Result<(), RepoError>;
    /// Clear the equipping character.
    async fn clear_character(&self, id: ItemId) -> Result<(), RepoError>;

    // Guarded batch state changes.
    //
    // Each call re-checks its guard for every id and applies all changes
    // atomically or none at all. The return value is the number of items
    // changed: `ids.len()` on success, `0` when any guard failed.

    /// Reassign items owned by `source` and not equipped to `target`.
    async fn transfer(
        &self,
        source: UserId,
        target: UserId,
        ids: &[ItemId],
    ) -> Result<usize, RepoError>;
    /// Clear the owner of items owned by `owner` and not equipped.
    async fn discard_many(&self, owner: UserId, ids: &[ItemId]) -> Result<usize, RepoError>;
    /// Equip items owned by `owner` and not yet equipped to `character`.
    async fn equip_many(
        &self,
        owner: UserId,
        character: CharacterId,
        ids: &[ItemId],
    ) -> Result<usize, RepoError>;
    /// Unequip items owned by `owner` and equipped to `character`.
    async fn unequip_many(
        &self,
        owner: UserId,
        character: CharacterId,
        ids: &[ItemId],
    ) -> Result<usize, RepoError>;
}

// =============================================================================
// Catalog Ports
// =============================================================================

/// Item types and perks are read-only for the rule engine; only the seed
/// loader writes them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepo: Send + Sync {
    async fn save_item_type(&self, item_type: &ItemType) -> Result<(), RepoError>;
    async fn save_perk(&self, perk: &Perk) -> Result<(), RepoError>;
    async fn get_item_type(&self, id: ItemTypeId) -> Result<Option<ItemType>, RepoError>;
    async fn get_perk(&self, id: PerkId) -> Result<Option<Perk>, RepoError>;
}
