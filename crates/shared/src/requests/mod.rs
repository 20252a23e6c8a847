//! Request bodies accepted by the HTTP API.
//!
//! Field names are camelCase on the wire (`sourceUserId`, `itemsId`, ...).

mod character;
mod items;

pub use character::{CharacterDiscardItemsRequest, EquipItemsRequest};
pub use items::{DiscardItemsRequest, TransferItemsRequest};
