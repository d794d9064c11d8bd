pub mod docs;
pub mod health;
pub mod posting;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .route("/allPosts", get(posting::list_posts))
        .route("/posts/:text", get(posting::search_posts))
        .route("/post", post(posting::create_post))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
