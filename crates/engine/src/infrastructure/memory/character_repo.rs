//! In-memory character repository.

use std::sync::Arc;

use async_trait::async_trait;
use armory_domain::{Character, CharacterId};

use super::InMemoryStore;
use crate::infrastructure::ports::{CharacterRepo, RepoError};

pub struct MemoryCharacterRepo {
    store: Arc<InMemoryStore>,
}

impl MemoryCharacterRepo {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CharacterRepo for MemoryCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.store.read().await.characters.get(id).cloned())
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        let mut tables = self.store.write().await;
        if !tables.users.contains(character.user_id) {
            return Err(RepoError::not_found("User", character.user_id));
        }
        tables.characters.insert(character.id, character.clone());
        Ok(())
    }

    async fn update(&self, character: &Character) -> Result<(), RepoError> {
        let mut tables = self.store.write().await;
        match tables.characters.get_mut(character.id) {
            Some(existing) => {
                *existing = character.clone();
                Ok(())
            }
            None => Err(RepoError::not_found("Character", character.id)),
        }
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        let mut tables = self.store.write().await;
        if tables.characters.remove(id).is_none() {
            return Err(RepoError::not_found("Character", id));
        }
        for item in tables.items.values_mut() {
            if item.is_equipped_to(id) {
                item.unequip();
            }
        }
        Ok(())
    }
}
