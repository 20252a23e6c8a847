//! Armory domain model.
//!
//! Users own characters and an inventory of items; characters equip items from
//! their owner's inventory. This crate holds the entities, their typed ids,
//! validated value objects and the state transitions of an item. It performs
//! no I/O.

extern crate self as armory_domain;

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{Character, Item, ItemType, Perk, User, DEFAULT_HEALTH, DEFAULT_LEVEL};
pub use error::DomainError;
pub use ids::{CharacterId, ItemId, ItemTypeId, PerkId, UserId};
pub use value_objects::{CharacterName, Email, ItemName};
