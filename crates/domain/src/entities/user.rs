//! User entity - An account that owns characters and an item inventory

use serde::{Deserialize, Serialize};

use armory_domain::{Email, UserId};

/// A registered account.
///
/// Characters and inventory items reference the user by id; the user record
/// itself carries no collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
}

impl User {
    pub fn new(id: UserId, email: Email) -> Self {
        Self { id, email }
    }
}
