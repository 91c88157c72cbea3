pub mod handlers;

use axum::Router;
use axum::routing::{get, patch};

use crate::api::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/collections",
            get(handlers::list_collections).post(handlers::create_collection),
        )
        .route(
            "/collections/{id}",
            get(handlers::get_collection)
                .patch(handlers::update_collection)
                .delete(handlers::delete_collection),
        )
        .route(
            "/collections/{id}/prompts",
            get(handlers::list_prompts).post(handlers::create_prompt),
        )
        .route(
            "/collections/{id}/prompts/reorder",
            patch(handlers::reorder_prompts),
        )
}
