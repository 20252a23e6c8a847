//! Use cases - User story orchestration.
//!
//! Use cases sit between the HTTP controllers and the repository ports.

pub mod inventory;

pub use inventory::{CharacterService, InventoryError, ItemService};
