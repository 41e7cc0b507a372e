//! API 路由

use axum::Router;
use axum::routing::get;
use axum::routing::post;

use super::handlers::{self, AppState};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/ai-settings/default", get(handlers::get_default_settings))
        .route(
            "/api/ai-settings/{id}",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route("/api/process-material", post(handlers::process_material))
        .route("/api/process-batch", post(handlers::process_batch))
        .route("/api/batch-template", get(handlers::batch_template))
        .route("/api/materials", get(handlers::list_materials))
        .route(
            "/api/materials/{id}",
            get(handlers::get_material)
                .put(handlers::update_material)
                .delete(handlers::delete_material),
        )
        .route("/api/processing-history", get(handlers::list_history))
        .route("/api/processing-history/{id}", get(handlers::get_history))
        .route(
            "/api/learning-examples",
            get(handlers::list_examples).post(handlers::create_example),
        )
        .route(
            "/api/learning-examples/{id}",
            get(handlers::get_example).delete(handlers::delete_example),
        )
        .with_state(state)
}
