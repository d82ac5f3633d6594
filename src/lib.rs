pub mod avatars;
pub mod config;
pub mod controllers;
pub mod database;
pub mod drafts;
pub mod middleware;
pub mod models;
pub mod services;
pub mod views;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

// Shared state for every screen
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub drafts: drafts::DraftStore,
    pub avatars: avatars::AvatarStore,
    pub renderer: services::ticket_image::TicketRenderer,
    pub event: models::Event,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;
        info!("Database connected");

        db.run_migrations().await?;

        let drafts = drafts::DraftStore::from_database(
            &db,
            config.storage.draft_slot,
            config.storage.fallback_key.clone(),
        );
        let renderer = services::ticket_image::TicketRenderer::new(&config.render);

        Ok(Arc::new(Self {
            db,
            drafts,
            avatars: avatars::AvatarStore::new(config.storage.avatar_capacity),
            renderer,
            event: models::Event::techember(),
            config,
        }))
    }
}

/// The whole wizard: selector, attendee form, ticket page.
pub fn app(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.storage.upload_limit_bytes;
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(controllers::routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
}
