pub mod handlers;

use axum::Router;
use axum::routing::patch;

use crate::api::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/prompts/{id}",
        patch(handlers::update_prompt).delete(handlers::delete_prompt),
    )
}
