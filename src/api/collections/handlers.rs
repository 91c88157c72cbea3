/// REST endpoints for collections and their prompts.
///
/// GET    /api/collections                          — list all collections
/// GET    /api/collections/{id}                     — get one collection
/// POST   /api/collections                          — create (title required)
/// PATCH  /api/collections/{id}                     — partial update
/// DELETE /api/collections/{id}                     — delete + cascade prompts
/// GET    /api/collections/{id}/prompts             — prompts sorted by order
/// POST   /api/collections/{id}/prompts             — create prompt (appends
///                                                    unless an order is given)
/// PATCH  /api/collections/{id}/prompts/reorder     — rewrite order fields
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::AppState;
use crate::store::{Collection, CollectionPatch, NewCollection, NewPrompt, Prompt};

fn storage_failure(what: &str, e: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    tracing::error!(error = %e, "failed to {what}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": format!("failed to {what}") })),
    )
}

fn invalid_data(errors: Vec<String>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid data", "errors": errors })),
    )
}

pub(crate) async fn list_collections(
    State(state): State<AppState>,
) -> Result<Json<Vec<Collection>>, (StatusCode, Json<Value>)> {
    let collections = state
        .store
        .list_collections()
        .await
        .map_err(|e| storage_failure("fetch collections", e))?;
    Ok(Json(collections))
}

pub(crate) async fn get_collection(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Collection>, (StatusCode, Json<Value>)> {
    let collection = state
        .store
        .get_collection(id)
        .await
        .map_err(|e| storage_failure("fetch collection", e))?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "collection not found" })),
            )
        })?;
    Ok(Json(collection))
}

#[derive(Deserialize)]
pub(crate) struct CreateCollectionRequest {
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

pub(crate) async fn create_collection(
    State(state): State<AppState>,
    Json(body): Json<CreateCollectionRequest>,
) -> Result<(StatusCode, Json<Collection>), (StatusCode, Json<Value>)> {
    let title = match body.title {
        Some(t) if !t.trim().is_empty() => t,
        _ => {
            return Err(invalid_data(vec![
                "title must be a non-empty string".to_string(),
            ]));
        }
    };

    let collection = state
        .store
        .create_collection(NewCollection {
            title,
            description: body.description,
        })
        .await
        .map_err(|e| storage_failure("create collection", e))?;

    tracing::info!(collection_id = collection.id, title = %collection.title, "created collection");
    Ok((StatusCode::CREATED, Json(collection)))
}

#[derive(Deserialize)]
pub(crate) struct UpdateCollectionRequest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

pub(crate) async fn update_collection(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCollectionRequest>,
) -> Result<Json<Collection>, (StatusCode, Json<Value>)> {
    if let Some(title) = &body.title {
        if title.trim().is_empty() {
            return Err(invalid_data(vec![
                "title must be a non-empty string".to_string(),
            ]));
        }
    }

    let collection = state
        .store
        .update_collection(
            id,
            CollectionPatch {
                title: body.title,
                description: body.description,
            },
        )
        .await
        .map_err(|e| storage_failure("update collection", e))?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "collection not found" })),
            )
        })?;
    Ok(Json(collection))
}

pub(crate) async fn delete_collection(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let deleted = state
        .store
        .delete_collection(id)
        .await
        .map_err(|e| storage_failure("delete collection", e))?;
    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "collection not found" })),
        ));
    }
    tracing::info!(collection_id = id, "deleted collection and its prompts");
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn list_prompts(
    State(state): State<AppState>,
    Path(collection_id): Path<i64>,
) -> Result<Json<Vec<Prompt>>, (StatusCode, Json<Value>)> {
    let prompts = state
        .store
        .list_prompts(collection_id)
        .await
        .map_err(|e| storage_failure("fetch prompts", e))?;
    Ok(Json(prompts))
}

#[derive(Deserialize)]
pub(crate) struct CreatePromptRequest {
    content: Option<String>,
    /// Omitted means append to the end; 0 is a real position, not a sentinel.
    #[serde(default)]
    order: Option<i64>,
}

pub(crate) async fn create_prompt(
    State(state): State<AppState>,
    Path(collection_id): Path<i64>,
    Json(body): Json<CreatePromptRequest>,
) -> Result<(StatusCode, Json<Prompt>), (StatusCode, Json<Value>)> {
    let content = match body.content {
        Some(c) if !c.trim().is_empty() => c,
        _ => {
            return Err(invalid_data(vec![
                "content must be a non-empty string".to_string(),
            ]));
        }
    };

    let prompt = state
        .store
        .create_prompt(NewPrompt {
            content,
            collection_id,
            order: body.order,
        })
        .await
        .map_err(|e| storage_failure("create prompt", e))?;

    tracing::info!(prompt_id = prompt.id, collection_id, order = prompt.order, "created prompt");
    Ok((StatusCode::CREATED, Json(prompt)))
}

pub(crate) async fn reorder_prompts(
    State(state): State<AppState>,
    Path(collection_id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    // The client sends the full drag-and-drop result; anything that is not
    // an array of ids is a 400, matching the contract.
    let prompt_ids: Vec<i64> = match body.get("promptIds").and_then(Value::as_array) {
        Some(values) => {
            let mut ids = Vec::with_capacity(values.len());
            for value in values {
                match value.as_i64() {
                    Some(id) => ids.push(id),
                    None => {
                        return Err((
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "error": "promptIds must be an array of integers" })),
                        ));
                    }
                }
            }
            ids
        }
        None => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "promptIds must be an array" })),
            ));
        }
    };

    state
        .store
        .reorder_prompts(collection_id, &prompt_ids)
        .await
        .map_err(|e| storage_failure("reorder prompts", e))?;

    tracing::info!(collection_id, count = prompt_ids.len(), "reordered prompts");
    Ok(StatusCode::NO_CONTENT)
}
