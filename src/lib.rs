use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;

use auth::IdentityResolver;
use database::ResourceStore;
use services::{NoteService, PreferenceService, ProfileService};

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<IdentityResolver>,
    pub store: Arc<dyn ResourceStore>,
    pub profiles: ProfileService,
    pub preferences: PreferenceService,
    pub notes: NoteService,
}

impl AppState {
    pub fn new(resolver: IdentityResolver, store: Arc<dyn ResourceStore>) -> Self {
        Self {
            resolver: Arc::new(resolver),
            profiles: ProfileService::new(store.clone()),
            preferences: PreferenceService::new(store.clone()),
            notes: NoteService::new(store.clone()),
            store,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/health", get(handlers::health::health))
        // Owner-scoped resources
        .merge(protected_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::{notes, preferences, profile};

    Router::new()
        .route("/profile", get(profile::get_profile).post(profile::upsert_profile))
        .route(
            "/preferences",
            get(preferences::get_preferences).post(preferences::upsert_preferences),
        )
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route("/notes/:id", patch(notes::patch_note).delete(notes::delete_note))
        .route_layer(from_fn_with_state(state, middleware::require_user))
}
