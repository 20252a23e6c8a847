//! Controllers - translate wire requests into service calls.
//!
//! A controller never interprets a failure: the service error is returned as
//! is and the HTTP layer decides the status code.

use std::sync::Arc;

use axum::http::StatusCode;
use armory_domain::{CharacterId, ItemId, UserId};
use armory_shared::{
    ApiResponse, CharacterDiscardItemsRequest, DiscardItemsRequest, EquipItemsRequest,
    TransferItemsRequest,
};

use crate::infrastructure::ports::RepoError;
use crate::use_cases::{CharacterService, InventoryError, ItemService};

pub const ITEMS_TRANSFERRED: &str = "Items transferred successfully";
pub const ITEMS_DISCARDED: &str = "Items discarded successfully";
// Misspelling is part of the wire contract.
pub const CHARACTER_EQUIPPED: &str = "Caracter equiped successfully";
pub const INVENTORY_LOADED: &str = "Inventory loaded";

/// Success envelope plus the status it is sent with.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerResponse {
    pub status: StatusCode,
    pub body: ApiResponse,
}

impl ControllerResponse {
    fn ok(message: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: ApiResponse::message(message),
        }
    }
}

fn item_ids(raw: &[i64]) -> Vec<ItemId> {
    raw.iter().copied().map(ItemId::new).collect()
}

/// Container for the controllers handed to the HTTP layer.
pub struct Controllers {
    pub item: ItemController,
    pub character: CharacterController,
}

impl Controllers {
    pub fn new(items: Arc<ItemService>, characters: Arc<CharacterService>) -> Self {
        Self {
            item: ItemController::new(items),
            character: CharacterController::new(characters),
        }
    }
}

pub struct ItemController {
    service: Arc<ItemService>,
}

impl ItemController {
    pub fn new(service: Arc<ItemService>) -> Self {
        Self { service }
    }

    pub async fn transfer_items(
        &self,
        request: TransferItemsRequest,
    ) -> Result<ControllerResponse, InventoryError> {
        self.service
            .transfer_items(
                UserId::new(request.source_user_id),
                UserId::new(request.target_user_id),
                &item_ids(&request.items_id),
            )
            .await?;
        Ok(ControllerResponse::ok(ITEMS_TRANSFERRED))
    }

    pub async fn discard_items(
        &self,
        request: DiscardItemsRequest,
    ) -> Result<ControllerResponse, InventoryError> {
        self.service
            .discard_many(UserId::new(request.user_id), &item_ids(&request.items_id))
            .await?;
        Ok(ControllerResponse::ok(ITEMS_DISCARDED))
    }

    pub async fn inventory(&self, user_id: i64) -> Result<ControllerResponse, InventoryError> {
        let items = self.service.inventory(UserId::new(user_id)).await?;
        let body = ApiResponse::with_data(INVENTORY_LOADED, &items)
            .map_err(|e| InventoryError::Repo(RepoError::serialization(e)))?;
        Ok(ControllerResponse {
            status: StatusCode::OK,
            body,
        })
    }
}

pub struct CharacterController {
    service: Arc<CharacterService>,
}

impl CharacterController {
    pub fn new(service: Arc<CharacterService>) -> Self {
        Self { service }
    }

    pub async fn equip_items(
        &self,
        request: EquipItemsRequest,
    ) -> Result<ControllerResponse, InventoryError> {
        self.service
            .equip(
                UserId::new(request.user_id),
                CharacterId::new(request.character_id),
                &item_ids(&request.items_id),
            )
            .await?;
        Ok(ControllerResponse::ok(CHARACTER_EQUIPPED))
    }

    pub async fn discard_items(
        &self,
        request: CharacterDiscardItemsRequest,
    ) -> Result<ControllerResponse, InventoryError> {
        self.service
            .discard_items(
                UserId::new(request.user_id),
                CharacterId::new(request.character_id),
                &item_ids(&request.items_id),
            )
            .await?;
        Ok(ControllerResponse::ok(ITEMS_DISCARDED))
    }
}
