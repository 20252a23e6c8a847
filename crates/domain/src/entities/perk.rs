//! Perk - A named effect attached to items

use serde::{Deserialize, Serialize};

use armory_domain::PerkId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perk {
    pub id: PerkId,
    pub name: String,
    pub effect: String,
}

impl Perk {
    pub fn new(id: PerkId, name: impl Into<String>, effect: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            effect: effect.into(),
        }
    }
}
