//! Armory Engine - Main entry point.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use armory_engine::api;
use armory_engine::app::{App, Repositories};
use armory_engine::infrastructure::{
    config::{self, AppConfig, StorageBackend},
    memory::InMemoryRepositories,
    seed::SeedData,
    sqlite::SqliteRepositories,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary is usually run from `crates/engine`).
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");
    config::load_dotenv_from(&repo_root);

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "armory_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Armory Engine");

    let config = AppConfig::from_env()?;

    let repositories = match config.storage {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory storage");
            Repositories::from(&InMemoryRepositories::new())
        }
        StorageBackend::Sqlite => {
            tracing::info!(url = %config.database_url, "Connecting to SQLite");
            let repos = SqliteRepositories::connect(&config.database_url).await?;
            Repositories::from(&repos)
        }
    };

    let app = Arc::new(App::new(repositories));

    if let Some(path) = &config.seed_file {
        tracing::info!(path = %path.display(), "Loading seed data");
        SeedData::load(path)?.apply(&app.repositories).await?;
    }

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(600));

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS has no valid origins, CORS disabled");
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
