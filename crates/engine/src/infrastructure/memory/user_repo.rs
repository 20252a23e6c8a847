//! In-memory user repository.

use std::sync::Arc;

use async_trait::async_trait;
use armory_domain::{User, UserId};

use super::InMemoryStore;
use crate::infrastructure::ports::{RepoError, UserRepo};

pub struct MemoryUserRepo {
    store: Arc<InMemoryStore>,
}

impl MemoryUserRepo {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.users.get(id).cloned())
    }

    async fn save(&self, user: &User) -> Result<(), RepoError> {
        let mut tables = self.store.write().await;
        let email_taken = tables
            .users
            .values()
            .any(|existing| existing.id != user.id && existing.email == user.email);
        if email_taken {
            return Err(RepoError::constraint(format!(
                "email {} is already registered",
                user.email
            )));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), RepoError> {
        let mut tables = self.store.write().await;
        if !tables.users.contains(id) {
            return Err(RepoError::not_found("User", id));
        }
        let has_characters = tables.characters.values().any(|c| c.user_id == id);
        let has_items = tables.items.values().any(|i| i.is_owned_by(id));
        if has_characters || has_items {
            return Err(RepoError::constraint(format!(
                "user {id} still owns characters or items"
            )));
        }
        tables.users.remove(id);
        Ok(())
    }
}
