//! Fixtures shared by the inventory use-case tests.

use armory_domain::{
    Character, CharacterId, CharacterName, Email, Item, ItemId, ItemName, ItemTypeId, User, UserId,
};

pub fn user(id: i64) -> User {
    User::new(
        UserId::new(id),
        Email::new(format!("user{id}@example.com")).unwrap(),
    )
}

pub fn character(id: i64, owner: UserId) -> Character {
    Character::new(
        CharacterId::new(id),
        owner,
        CharacterName::new(format!("Character {id}")).unwrap(),
    )
}

pub fn owned_item(id: i64, owner: UserId) -> Item {
    Item::new(
        ItemId::new(id),
        ItemName::new(format!("Item {id}")).unwrap(),
        ItemTypeId::new(1),
    )
    .with_owner(owner)
}

pub fn equipped_item(id: i64, owner: UserId, character: i64) -> Item {
    let mut item = owned_item(id, owner);
    item.equip_to(CharacterId::new(character)).unwrap();
    item
}
