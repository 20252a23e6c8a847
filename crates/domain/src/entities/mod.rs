//! Domain entities - Core business objects with identity

mod character;
mod item;
mod item_type;
mod perk;
mod user;

pub use character::{Character, DEFAULT_HEALTH, DEFAULT_LEVEL};
pub use item::Item;
pub use item_type::ItemType;
pub use perk::Perk;
pub use user::User;
