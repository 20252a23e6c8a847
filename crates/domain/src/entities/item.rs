//! Item entity - Objects held in a user's inventory and equipped by characters
//!
//! # Ownership states
//!
//! An item is always in exactly one of three states:
//!
//! | owner_id | character_id | state |
//! |---|---|---|
//! | `None` | `None` | unowned (discarded from every inventory) |
//! | `Some(user)` | `None` | in `user`'s inventory |
//! | `Some(user)` | `Some(character)` | in `user`'s inventory and equipped by `character` |
//!
//! `character_id` may be set only while `owner_id` is set. The transition
//! methods below are the only code paths that move an item between states.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use armory_domain::{CharacterId, ItemId, ItemName, ItemTypeId, PerkId, UserId};

/// An object that can be owned by a user and equipped by one of their characters.
///
/// Fields are public for adapters that hydrate rows; state changes go through
/// [`Item::transfer_to`], [`Item::equip_to`], [`Item::unequip`] and
/// [`Item::discard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: ItemName,
    pub item_type_id: ItemTypeId,
    #[serde(default)]
    pub perks: Vec<PerkId>,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub character_id: Option<CharacterId>,
}

impl Item {
    /// Create an unowned, unequipped item.
    pub fn new(id: ItemId, name: ItemName, item_type_id: ItemTypeId) -> Self {
        Self {
            id,
            name,
            item_type_id,
            perks: Vec::new(),
            owner_id: None,
            character_id: None,
        }
    }

    pub fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_perks(mut self, perks: Vec<PerkId>) -> Self {
        self.perks = perks;
        self
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == Some(user_id)
    }

    pub fn is_equipped(&self) -> bool {
        self.character_id.is_some()
    }

    pub fn is_equipped_to(&self, character_id: CharacterId) -> bool {
        self.character_id == Some(character_id)
    }

    /// Move the item into another user's inventory.
    ///
    /// Equipped items cannot change hands.
    pub fn transfer_to(&mut self, user_id: UserId) -> Result<(), DomainError> {
        if self.is_equipped() {
            return Err(DomainError::constraint(format!(
                "item {} is equipped and cannot be transferred",
                self.id
            )));
        }
        self.owner_id = Some(user_id);
        Ok(())
    }

    /// Equip the item to a character of its owner.
    pub fn equip_to(&mut self, character_id: CharacterId) -> Result<(), DomainError> {
        if self.owner_id.is_none() {
            return Err(DomainError::constraint(format!(
                "item {} has no owner and cannot be equipped",
                self.id
            )));
        }
        if let Some(current) = self.character_id {
            return Err(DomainError::constraint(format!(
                "item {} is already equipped to character {}",
                self.id, current
            )));
        }
        self.character_id = Some(character_id);
        Ok(())
    }

    /// Take the item off its character. It stays in the owner's inventory.
    pub fn unequip(&mut self) {
        self.character_id = None;
    }

    /// Remove the item from its owner's inventory.
    pub fn discard(&mut self) -> Result<(), DomainError> {
        if self.is_equipped() {
            return Err(DomainError::constraint(format!(
                "item {} is equipped and cannot be discarded",
                self.id
            )));
        }
        self.owner_id = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sword() -> Item {
        Item::new(
            ItemId::new(1),
            ItemName::new("Sword").unwrap(),
            ItemTypeId::new(1),
        )
    }

    #[test]
    fn new_item_is_unowned() {
        let item = sword();
        assert_eq!(item.owner_id, None);
        assert!(!item.is_equipped());
    }

    #[test]
    fn equip_requires_owner() {
        let mut item = sword();
        let result = item.equip_to(CharacterId::new(3));
        assert!(matches!(result, Err(DomainError::Constraint(_))));
        assert_eq!(item.character_id, None);
    }

    #[test]
    fn equip_rejects_second_character() {
        let mut item = sword().with_owner(UserId::new(1));
        item.equip_to(CharacterId::new(3)).unwrap();
        assert!(item.is_equipped_to(CharacterId::new(3)));

        assert!(item.equip_to(CharacterId::new(4)).is_err());
        assert!(item.is_equipped_to(CharacterId::new(3)));
    }

    #[test]
    fn equipped_item_cannot_be_transferred_or_discarded() {
        let mut item = sword().with_owner(UserId::new(1));
        item.equip_to(CharacterId::new(3)).unwrap();

        assert!(item.transfer_to(UserId::new(2)).is_err());
        assert!(item.discard().is_err());
        assert!(item.is_owned_by(UserId::new(1)));
    }

    #[test]
    fn unequip_then_discard_clears_owner() {
        let mut item = sword().with_owner(UserId::new(1));
        item.equip_to(CharacterId::new(3)).unwrap();
        item.unequip();
        item.discard().unwrap();

        assert_eq!(item.owner_id, None);
        assert_eq!(item.character_id, None);
    }

    #[test]
    fn serializes_camel_case_wire_fields() {
        let item = sword().with_owner(UserId::new(5));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["ownerId"], 5);
        assert_eq!(json["itemTypeId"], 1);
        assert!(json["characterId"].is_null());
    }
}
