use serde::{Deserialize, Serialize};

/// `POST /api/character/equip-items`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipItemsRequest {
    pub user_id: i64,
    pub character_id: i64,
    pub items_id: Vec<i64>,
}

/// `POST /api/character/discard-items`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDiscardItemsRequest {
    pub user_id: i64,
    pub character_id: i64,
    pub items_id: Vec<i64>,
}
