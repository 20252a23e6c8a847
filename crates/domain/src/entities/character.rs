//! Character entity - A user's playable character

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use armory_domain::{CharacterId, CharacterName, UserId};

/// Starting stats for freshly created characters.
pub const DEFAULT_LEVEL: u32 = 1;
pub const DEFAULT_HEALTH: u32 = 100;

/// A character belonging to exactly one user.
///
/// Equipment is not stored here: an item points at the character that
/// equips it through `Item::character_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub user_id: UserId,
    pub name: CharacterName,
    pub level: u32,
    pub health: u32,
}

impl Character {
    pub fn new(id: CharacterId, user_id: UserId, name: CharacterName) -> Self {
        Self {
            id,
            user_id,
            name,
            level: DEFAULT_LEVEL,
            health: DEFAULT_HEALTH,
        }
    }

    /// Override level and health.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `level` is zero.
    pub fn with_stats(mut self, level: u32, health: u32) -> Result<Self, DomainError> {
        if level == 0 {
            return Err(DomainError::validation("Level must be at least 1"));
        }
        self.level = level;
        self.health = health;
        Ok(self)
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}
