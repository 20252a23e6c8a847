//! Item type - Catalog entry grouping items (weapon, armor, ...)

use serde::{Deserialize, Serialize};

use armory_domain::ItemTypeId;

/// Read-only catalog lookup; items reference it through `item_type_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemType {
    pub id: ItemTypeId,
    pub name: String,
}

impl ItemType {
    pub fn new(id: ItemTypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
