use super::{handlers, state::AppState};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(e) => {
            warn!("Ignoring invalid CORS origin '{origin}': {e}");
            layer
        }
    }
}

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config.cors_origin);
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/api/recommendations",
            get(handlers::recommendations_handler),
        )
        .route(
            "/api/profile",
            get(handlers::get_profile_handler).put(handlers::update_profile_handler),
        )
        .route(
            "/api/moodlogs",
            post(handlers::create_mood_log_handler).get(handlers::list_mood_logs_handler),
        )
        .route(
            "/api/content",
            get(handlers::list_content_handler).post(handlers::create_content_handler),
        )
        .route(
            "/api/content/{id}",
            get(handlers::get_content_handler)
                .put(handlers::update_content_handler)
                .delete(handlers::delete_content_handler),
        )
        .route(
            "/api/content/{id}/interactions",
            post(handlers::record_interaction_handler),
        )
        .route(
            "/api/content/{id}/interactions/me",
            get(handlers::my_interaction_handler),
        )
        .route(
            "/api/tasks",
            get(handlers::list_tasks_handler).post(handlers::create_task_handler),
        )
        .route(
            "/api/tasks/{id}/complete",
            post(handlers::complete_task_handler),
        )
        .route("/api/tasks/me/stats", get(handlers::task_stats_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
