//! JSON fixture loader.
//!
//! Populates whichever store is configured with users, characters, catalog
//! entries and items. Records are written in dependency order so owners exist
//! before the items that reference them.

use std::path::{Path, PathBuf};

use armory_domain::{
    Character, CharacterId, CharacterName, DomainError, Item, ItemType, Perk, User, UserId,
};
use serde::Deserialize;

use crate::app::Repositories;
use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid seed JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid seed record: {0}")]
    Invalid(#[from] DomainError),
    #[error("Failed to store seed record: {0}")]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedCharacter {
    id: CharacterId,
    user_id: UserId,
    name: CharacterName,
    #[serde(default)]
    level: Option<u32>,
    #[serde(default)]
    health: Option<u32>,
}

impl SeedCharacter {
    fn into_character(self) -> Result<Character, DomainError> {
        let character = Character::new(self.id, self.user_id, self.name);
        match (self.level, self.health) {
            (None, None) => Ok(character),
            (level, health) => {
                let level = level.unwrap_or(character.level);
                let health = health.unwrap_or(character.health);
                character.with_stats(level, health)
            }
        }
    }
}

/// Contents of a seed file. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeedData {
    users: Vec<User>,
    characters: Vec<SeedCharacter>,
    item_types: Vec<ItemType>,
    perks: Vec<Perk>,
    items: Vec<Item>,
}

/// Record counts written by [`SeedData::apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub characters: usize,
    pub catalog: usize,
    pub items: usize,
}

impl SeedData {
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub async fn apply(self, repos: &Repositories) -> Result<SeedSummary, SeedError> {
        let mut summary = SeedSummary::default();

        for user in &self.users {
            repos.user.save(user).await?;
            summary.users += 1;
        }
        for seed in self.characters {
            let character = seed.into_character()?;
            repos.character.save(&character).await?;
            summary.characters += 1;
        }
        for item_type in &self.item_types {
            repos.catalog.save_item_type(item_type).await?;
            summary.catalog += 1;
        }
        for perk in &self.perks {
            repos.catalog.save_perk(perk).await?;
            summary.catalog += 1;
        }
        for item in &self.items {
            repos.item.save(item).await?;
            summary.items += 1;
        }

        tracing::info!(
            users = summary.users,
            characters = summary.characters,
            catalog = summary.catalog,
            items = summary.items,
            "Seed data applied"
        );
        Ok(summary)
    }
}
