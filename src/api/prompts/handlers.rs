/// REST endpoints addressing prompts by id.
///
/// PATCH  /api/prompts/{id}  — partial update (content and/or order)
/// DELETE /api/prompts/{id}  — delete one prompt; never cascades
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::AppState;
use crate::store::{Prompt, PromptPatch};

#[derive(Deserialize)]
pub(crate) struct UpdatePromptRequest {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    order: Option<i64>,
}

pub(crate) async fn update_prompt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePromptRequest>,
) -> Result<Json<Prompt>, (StatusCode, Json<Value>)> {
    if let Some(content) = &body.content {
        if content.trim().is_empty() {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid data",
                    "errors": ["content must be a non-empty string"],
                })),
            ));
        }
    }

    let prompt = state
        .store
        .update_prompt(
            id,
            PromptPatch {
                content: body.content,
                order: body.order,
            },
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, prompt_id = id, "failed to update prompt");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "failed to update prompt" })),
            )
        })?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "prompt not found" })),
            )
        })?;
    Ok(Json(prompt))
}

pub(crate) async fn delete_prompt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let deleted = state.store.delete_prompt(id).await.map_err(|e| {
        tracing::error!(error = %e, prompt_id = id, "failed to delete prompt");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "failed to delete prompt" })),
        )
    })?;
    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "prompt not found" })),
        ));
    }
    tracing::info!(prompt_id = id, "deleted prompt");
    Ok(StatusCode::NO_CONTENT)
}
