mod handlers;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;
use crate::services::{LifecycleManager, SchedulingService};

/// Shared handler state: the store handle plus the two mutation services.
/// One scheduling service instance serves every request, which is what makes
/// its allocation critical section effective.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub scheduling: Arc<SchedulingService>,
    pub lifecycle: Arc<LifecycleManager>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        let scheduling = Arc::new(SchedulingService::new(db.clone()));
        let lifecycle = Arc::new(LifecycleManager::new(db.clone()));
        Self {
            db,
            scheduling,
            lifecycle,
        }
    }
}

pub fn create_router(db: Database) -> Router {
    let api = Router::new()
        .route("/planets", get(handlers::list_planets))
        .route("/launches", get(handlers::list_launches))
        .route("/launches", post(handlers::create_launch))
        .route("/launches/{id}", delete(handlers::abort_launch));

    Router::new()
        .nest("/v1", api)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(db))
}
