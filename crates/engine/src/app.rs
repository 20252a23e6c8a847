//! Application state and composition.

use std::sync::Arc;

use crate::api::controllers::Controllers;
use crate::infrastructure::{
    memory::InMemoryRepositories,
    ports::{CatalogRepo, CharacterRepo, ItemRepo, UserRepo},
    sqlite::SqliteRepositories,
};
use crate::use_cases::{CharacterService, ItemService};

/// Main application state.
///
/// Passed to HTTP handlers via Axum state. The repositories stay reachable
/// for startup work such as seeding.
pub struct App {
    pub repositories: Repositories,
    pub controllers: Controllers,
}

/// Container for all repository ports.
///
/// Whichever backend is configured, the rest of the app only sees the traits.
#[derive(Clone)]
pub struct Repositories {
    pub user: Arc<dyn UserRepo>,
    pub character: Arc<dyn CharacterRepo>,
    pub item: Arc<dyn ItemRepo>,
    pub catalog: Arc<dyn CatalogRepo>,
}

impl From<&InMemoryRepositories> for Repositories {
    fn from(repos: &InMemoryRepositories) -> Self {
        Self {
            user: repos.user.clone(),
            character: repos.character.clone(),
            item: repos.item.clone(),
            catalog: repos.catalog.clone(),
        }
    }
}

impl From<&SqliteRepositories> for Repositories {
    fn from(repos: &SqliteRepositories) -> Self {
        Self {
            user: repos.user.clone(),
            character: repos.character.clone(),
            item: repos.item.clone(),
            catalog: repos.catalog.clone(),
        }
    }
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(repositories: Repositories) -> Self {
        let item = Arc::new(ItemService::new(
            repositories.user.clone(),
            repositories.item.clone(),
        ));
        let character = Arc::new(CharacterService::new(
            repositories.character.clone(),
            repositories.item.clone(),
        ));

        Self {
            controllers: Controllers::new(item, character),
            repositories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::seed::SeedData;

    #[tokio::test]
    async fn seeding_through_the_app_is_visible_to_controllers() {
        let app = App::new(Repositories::from(&InMemoryRepositories::new()));
        SeedData::from_json(
            r#"{
                "users": [{"id": 1, "email": "alice@example.com"}],
                "items": [{"id": 1, "name": "Sword", "itemTypeId": 1, "ownerId": 1}]
            }"#,
        )
        .unwrap()
        .apply(&app.repositories)
        .await
        .unwrap();

        let response = app.controllers.item.inventory(1).await.unwrap();
        let data = response.body.data.unwrap();
        assert_eq!(data.as_array().map(Vec::len), Some(1));
    }
}
