//! AI tool directory backend.
//!
//! A REST backend with SQLite persistence and live snapshot subscriptions,
//! plus the client-side pieces that sit on top of it: the bookmark store and
//! the category canvas editor.

pub mod api;
pub mod auth;
pub mod bookmarks;
pub mod canvas;
pub mod config;
pub mod db;
pub mod errors;
pub mod listing;
pub mod live;
pub mod models;
pub mod service;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;
use service::Directory;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub directory: Directory,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, config: Config) -> Self {
        let directory = Directory::new(repo.clone(), auth::AdminGate::new(&config.admin_email));
        Self {
            repo,
            directory,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    let api_routes = Router::new()
        .route("/revision", get(api::get_revision))
        // Tools
        .route("/tools", get(api::list_tools).post(api::create_tool))
        .route("/tools/live", get(api::live_tools))
        .route("/tools/seed", post(api::seed_tools))
        .route(
            "/tools/{id}",
            get(api::get_tool)
                .patch(api::update_tool)
                .delete(api::delete_tool),
        )
        .route("/tools/{id}/upvote", post(api::upvote_tool))
        // Categories
        .route(
            "/categories",
            get(api::list_categories).post(api::create_category),
        )
        .route("/categories/live", get(api::live_categories))
        .route(
            "/categories/{id}",
            patch(api::update_category).delete(api::delete_category),
        )
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
