pub mod memory;
pub mod seed;
pub mod sqlite;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A named group of prompts. Owns its prompts: deleting a collection
/// cascades to every prompt whose `collection_id` references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single reusable text item. `order` is the zero-based position within
/// its collection's display sequence; the wire format is camelCase to match
/// the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: i64,
    pub content: String,
    pub collection_id: i64,
    pub order: i64,
}

#[derive(Debug, Clone)]
pub struct NewCollection {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CollectionPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// `order: None` means append to the end of the collection. An explicit
/// `Some(n)` is used verbatim, including `Some(0)` for the first position.
#[derive(Debug, Clone)]
pub struct NewPrompt {
    pub content: String,
    pub collection_id: i64,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct PromptPatch {
    pub content: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Storage contract shared by the ephemeral in-process store and the
/// persistent SQLite store. Multi-step writes (reorder, cascade delete,
/// append-position computation) are atomic in both implementations.
#[async_trait]
pub trait Store: Send + Sync {
    // Collections
    async fn list_collections(&self) -> Result<Vec<Collection>, StoreError>;
    async fn get_collection(&self, id: i64) -> Result<Option<Collection>, StoreError>;
    async fn create_collection(&self, new: NewCollection) -> Result<Collection, StoreError>;
    async fn update_collection(
        &self,
        id: i64,
        patch: CollectionPatch,
    ) -> Result<Option<Collection>, StoreError>;
    /// Deletes the collection and all of its prompts. Returns false if the
    /// collection did not exist.
    async fn delete_collection(&self, id: i64) -> Result<bool, StoreError>;

    // Prompts
    /// All prompts of a collection, sorted ascending by `(order, id)`. The
    /// sort is applied at read time, never assumed from insertion order.
    async fn list_prompts(&self, collection_id: i64) -> Result<Vec<Prompt>, StoreError>;
    async fn get_prompt(&self, id: i64) -> Result<Option<Prompt>, StoreError>;
    async fn create_prompt(&self, new: NewPrompt) -> Result<Prompt, StoreError>;
    async fn update_prompt(
        &self,
        id: i64,
        patch: PromptPatch,
    ) -> Result<Option<Prompt>, StoreError>;
    async fn delete_prompt(&self, id: i64) -> Result<bool, StoreError>;

    /// Assigns each prompt in `prompt_ids` an order equal to its zero-based
    /// position in the sequence. Ids that do not belong to the collection
    /// are ignored; prompts omitted from the sequence keep their previous
    /// order. The whole rewrite is applied atomically.
    async fn reorder_prompts(
        &self,
        collection_id: i64,
        prompt_ids: &[i64],
    ) -> Result<(), StoreError>;

    /// True once any collection exists. Drives first-run seeding.
    async fn is_seeded(&self) -> Result<bool, StoreError>;
}
