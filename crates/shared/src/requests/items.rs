use serde::{Deserialize, Serialize};

/// `POST /api/item/transfer-items`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferItemsRequest {
    pub source_user_id: i64,
    pub target_user_id: i64,
    pub items_id: Vec<i64>,
}

/// `POST /api/item/discard-items`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscardItemsRequest {
    pub user_id: i64,
    pub items_id: Vec<i64>,
}
