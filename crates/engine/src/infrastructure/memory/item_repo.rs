//! In-memory item repository.
//!
//! Batch writes hold the store's write lock for the whole check-and-apply,
//! so they are all-or-nothing with respect to other requests.

use std::sync::Arc;

use async_trait::async_trait;
use armory_domain::{CharacterId, DomainError, Item, ItemId, UserId};

use super::{Arena, InMemoryStore};
use crate::infrastructure::ports::{ItemRepo, RepoError};

pub struct MemoryItemRepo {
    store: Arc<InMemoryStore>,
}

impl MemoryItemRepo {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

/// Apply `change` to every id if all of them exist and pass `guard`.
fn apply_guarded<G, C>(
    items: &mut Arena<ItemId, Item>,
    ids: &[ItemId],
    guard: G,
    mut change: C,
) -> Result<usize, RepoError>
where
    G: Fn(&Item) -> bool,
    C: FnMut(&mut Item) -> Result<(), DomainError>,
{
    if !ids.iter().all(|id| items.get(*id).is_some_and(&guard)) {
        return Ok(0);
    }
    for id in ids {
        if let Some(item) = items.get_mut(*id) {
            change(item)?;
        }
    }
    Ok(ids.len())
}

#[async_trait]
impl ItemRepo for MemoryItemRepo {
    async fn get(&self, id: ItemId) -> Result<Option<Item>, RepoError> {
        Ok(self.store.read().await.items.get(id).cloned())
    }

    async fn save(&self, item: &Item) -> Result<(), RepoError> {
        let mut tables = self.store.write().await;
        if item.character_id.is_some() && item.owner_id.is_none() {
            return Err(RepoError::constraint(format!(
                "item {} is equipped but has no owner",
                item.id
            )));
        }
        if let Some(owner) = item.owner_id {
            if !tables.users.contains(owner) {
                return Err(RepoError::not_found("User", owner));
            }
        }
        if let Some(character) = item.character_id {
            let holder = tables
                .characters
                .get(character)
                .ok_or_else(|| RepoError::not_found("Character", character))?;
            if item.owner_id != Some(holder.user_id) {
                return Err(RepoError::constraint(format!(
                    "item {} cannot be equipped to character {character} of another user",
                    item.id
                )));
            }
        }
        tables.items.insert(item.id, item.clone());
        Ok(())
    }

    async fn delete(&self, id: ItemId) -> Result<(), RepoError> {
        match self.store.write().await.items.remove(id) {
            Some(_) => Ok(()),
            None => Err(RepoError::not_found("Item", id)),
        }
    }

    async fn get_many(&self, ids: &[ItemId]) -> Result<Vec<Item>, RepoError> {
        let tables = self.store.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.items.get(*id).cloned())
            .collect())
    }

    async fn count_owned(&self, owner: UserId, ids: &[ItemId]) -> Result<usize, RepoError> {
        let tables = self.store.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.items.get(*id))
            .filter(|item| item.is_owned_by(owner))
            .count())
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<Item>, RepoError> {
        let tables = self.store.read().await;
        Ok(tables
            .items
            .values()
            .filter(|item| item.is_owned_by(owner))
            .cloned()
            .collect())
    }

    async fn update_character_id(
        &self,
        id: ItemId,
        character_id: Option<CharacterId>,
    ) -> Result<(), RepoError> {
        let mut tables = self.store.write().await;
        let holder = match character_id {
            Some(character_id) => Some(
                tables
                    .characters
                    .get(character_id)
                    .map(|character| character.user_id)
                    .ok_or_else(|| RepoError::not_found("Character", character_id))?,
            ),
            None => None,
        };
        let item = tables
            .items
            .get_mut(id)
            .ok_or_else(|| RepoError::not_found("Item", id))?;
        match (character_id, holder) {
            (Some(character_id), Some(holder)) => {
                if item.owner_id.is_some() && item.owner_id != Some(holder) {
                    return Err(RepoError::constraint(format!(
                        "item {id} cannot be equipped to character {character_id} of another user"
                    )));
                }
                item.unequip();
                item.equip_to(character_id)?;
            }
            _ => item.unequip(),
        }
        Ok(())
    }

    async fn discard(&self, id: ItemId) -> Result<(), RepoError> {
        let mut tables = self.store.write().await;
        let item = tables
            .items
            .get_mut(id)
            .ok_or_else(|| RepoError::not_found("Item", id))?;
        item.discard()?;
        Ok(())
    }

    async fn clear_character(&self, id: ItemId) -> Result<(), RepoError> {
        let mut tables = self.store.write().await;
        let item = tables
            .items
            .get_mut(id)
            .ok_or_else(|| RepoError::not_found("Item", id))?;
        item.unequip();
        Ok(())
    }

    async fn transfer(
        &self,
        source: UserId,
        target: UserId,
        ids: &[ItemId],
    ) -> Result<usize, RepoError> {
        let mut tables = self.store.write().await;
        apply_guarded(
            &mut tables.items,
            ids,
            |item| item.is_owned_by(source) && !item.is_equipped(),
            |item| item.transfer_to(target),
        )
    }

    async fn discard_many(&self, owner: UserId, ids: &[ItemId]) -> Result<usize, RepoError> {
        let mut tables = self.store.write().await;
        apply_guarded(
            &mut tables.items,
            ids,
            |item| item.is_owned_by(owner) && !item.is_equipped(),
            Item::discard,
        )
    }

    async fn equip_many(
        &self,
        owner: UserId,
        character: CharacterId,
        ids: &[ItemId],
    ) -> Result<usize, RepoError> {
        let mut tables = self.store.write().await;
        apply_guarded(
            &mut tables.items,
            ids,
            |item| item.is_owned_by(owner) && !item.is_equipped(),
            |item| item.equip_to(character),
        )
    }

    async fn unequip_many(
        &self,
        owner: UserId,
        character: CharacterId,
        ids: &[ItemId],
    ) -> Result<usize, RepoError> {
        let mut tables = self.store.write().await;
        apply_guarded(
            &mut tables.items,
            ids,
            |item| item.is_owned_by(owner) && item.is_equipped_to(character),
            |item| {
                item.unequip();
                Ok(())
            },
        )
    }
}
