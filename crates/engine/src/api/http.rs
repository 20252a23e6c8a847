//! HTTP routes.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use armory_shared::{
    CharacterDiscardItemsRequest, DiscardItemsRequest, EquipItemsRequest,
    ErrorCode, ErrorResponse, TransferItemsRequest,
};

use super::controllers::ControllerResponse;
use crate::app::App;
use crate::use_cases::InventoryError;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/item/transfer-items", post(transfer_items))
        .route("/api/item/discard-items", post(discard_items))
        .route("/api/character/equip-items", post(equip_items))
        .route("/api/character/discard-items", post(character_discard_items))
        .route("/api/users/{id}/items", get(user_inventory))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "ALIVE" }))
}

// =============================================================================
// Items
// =============================================================================

async fn transfer_items(
    State(app): State<Arc<App>>,
    payload: Result<Json<TransferItemsRequest>, JsonRejection>,
) -> Result<ControllerResponse, ApiError> {
    let Json(request) = payload?;
    Ok(app.controllers.item.transfer_items(request).await?)
}

async fn discard_items(
    State(app): State<Arc<App>>,
    payload: Result<Json<DiscardItemsRequest>, JsonRejection>,
) -> Result<ControllerResponse, ApiError> {
    let Json(request) = payload?;
    Ok(app.controllers.item.discard_items(request).await?)
}

async fn user_inventory(
    State(app): State<Arc<App>>,
    Path(user_id): Path<i64>,
) -> Result<ControllerResponse, ApiError> {
    Ok(app.controllers.item.inventory(user_id).await?)
}

// =============================================================================
// Characters
// =============================================================================

async fn equip_items(
    State(app): State<Arc<App>>,
    payload: Result<Json<EquipItemsRequest>, JsonRejection>,
) -> Result<ControllerResponse, ApiError> {
    let Json(request) = payload?;
    Ok(app.controllers.character.equip_items(request).await?)
}

async fn character_discard_items(
    State(app): State<Arc<App>>,
    payload: Result<Json<CharacterDiscardItemsRequest>, JsonRejection>,
) -> Result<ControllerResponse, ApiError> {
    let Json(request) = payload?;
    Ok(app.controllers.character.discard_items(request).await?)
}

// =============================================================================
// Responses
// =============================================================================

impl IntoResponse for ControllerResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::BadRequest, message),
            ),
            ApiError::Inventory(InventoryError::Repo(e)) => {
                tracing::error!(error = %e, "Repository failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(ErrorCode::Internal, "Internal server error"),
                )
            }
            ApiError::Inventory(e) => {
                let status = if e.is_rule_violation() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::CONFLICT
                };
                (status, ErrorResponse::new(e.code(), e.to_string()))
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Repositories;
    use crate::infrastructure::memory::InMemoryRepositories;
    use crate::infrastructure::ports::{CharacterRepo, ItemRepo, RepoError, UserRepo};
    use crate::use_cases::inventory::test_support::{character, owned_item, user};
    use armory_domain::{ItemId, UserId};
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_router() -> (InMemoryRepositories, Router) {
        let repos = InMemoryRepositories::new();
        repos.user.save(&user(1)).await.unwrap();
        repos.user.save(&user(2)).await.unwrap();
        repos
            .character
            .save(&character(1, UserId::new(1)))
            .await
            .unwrap();
        for id in 1..=2 {
            repos
                .item
                .save(&owned_item(id, UserId::new(1)))
                .await
                .unwrap();
        }
        let app = Arc::new(App::new(Repositories::from(&repos)));
        (repos, routes().with_state(app))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_alive() {
        let (_repos, router) = test_router().await;
        let request = Request::get("/api/health").body(Body::empty()).unwrap();

        let (status, body) = send(router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "ALIVE"}));
    }

    #[tokio::test]
    async fn transfer_succeeds_with_null_data() {
        let (repos, router) = test_router().await;

        let (status, body) = send(
            router,
            post_json(
                "/api/item/transfer-items",
                json!({"sourceUserId": 1, "targetUserId": 2, "itemsId": [1, 2]}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"message": "Items transferred successfully", "data": null})
        );
        let item = repos.item.get(ItemId::new(1)).await.unwrap().unwrap();
        assert_eq!(item.owner_id, Some(UserId::new(2)));
    }

    #[tokio::test]
    async fn rule_violation_is_bad_request_with_literal_message() {
        let (_repos, router) = test_router().await;

        let (status, body) = send(
            router,
            post_json(
                "/api/item/discard-items",
                json!({"userId": 2, "itemsId": [1]}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Some items do not belong to the user");
        assert_eq!(body["code"], "ITEMS_NOT_OWNED_BY_USER");
    }

    #[tokio::test]
    async fn equip_then_character_discard() {
        let (_repos, router) = test_router().await;

        let (status, body) = send(
            router.clone(),
            post_json(
                "/api/character/equip-items",
                json!({"userId": 1, "characterId": 1, "itemsId": [1]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Caracter equiped successfully");

        let (status, body) = send(
            router,
            post_json(
                "/api/character/discard-items",
                json!({"userId": 1, "characterId": 1, "itemsId": [1]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Items discarded successfully");
    }

    #[tokio::test]
    async fn unknown_character_is_reported() {
        let (_repos, router) = test_router().await;

        let (status, body) = send(
            router,
            post_json(
                "/api/character/equip-items",
                json!({"userId": 1, "characterId": 42, "itemsId": [1]}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Character not found");
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let (_repos, router) = test_router().await;

        let (status, body) = send(
            router,
            post_json(
                "/api/item/transfer-items",
                json!({"sourceUserId": "one", "itemsId": [1]}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn inventory_lists_owned_items() {
        let (_repos, router) = test_router().await;
        let request = Request::get("/api/users/1/items")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Inventory loaded");
        assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn concurrent_modification_maps_to_conflict() {
        let response = ApiError::from(InventoryError::ConcurrentModification).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn repository_failure_hides_details() {
        let error = InventoryError::Repo(RepoError::database("item.transfer", "disk full"));
        let response = ApiError::from(error).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
