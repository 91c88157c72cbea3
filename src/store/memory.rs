use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    Collection, CollectionPatch, NewCollection, NewPrompt, Prompt, PromptPatch, Store, StoreError,
};

#[derive(Default)]
struct MemInner {
    collections: HashMap<i64, Collection>,
    prompts: HashMap<i64, Prompt>,
    next_collection_id: i64,
    next_prompt_id: i64,
}

/// Ephemeral in-process store. All state lives behind a single lock so that
/// multi-step writes (cascade delete, reorder) never expose a partial state;
/// everything is gone on restart.
pub struct MemStore {
    inner: RwLock<MemInner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemInner {
                collections: HashMap::new(),
                prompts: HashMap::new(),
                next_collection_id: 1,
                next_prompt_id: 1,
            }),
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_prompts(inner: &MemInner, collection_id: i64) -> Vec<Prompt> {
    let mut prompts: Vec<Prompt> = inner
        .prompts
        .values()
        .filter(|p| p.collection_id == collection_id)
        .cloned()
        .collect();
    prompts.sort_by_key(|p| (p.order, p.id));
    prompts
}

#[async_trait]
impl Store for MemStore {
    async fn list_collections(&self) -> Result<Vec<Collection>, StoreError> {
        let inner = self.inner.read().await;
        let mut collections: Vec<Collection> = inner.collections.values().cloned().collect();
        collections.sort_by_key(|c| c.id);
        Ok(collections)
    }

    async fn get_collection(&self, id: i64) -> Result<Option<Collection>, StoreError> {
        Ok(self.inner.read().await.collections.get(&id).cloned())
    }

    async fn create_collection(&self, new: NewCollection) -> Result<Collection, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_collection_id;
        inner.next_collection_id += 1;

        let collection = Collection {
            id,
            title: new.title,
            description: new.description,
        };
        inner.collections.insert(id, collection.clone());
        Ok(collection)
    }

    async fn update_collection(
        &self,
        id: i64,
        patch: CollectionPatch,
    ) -> Result<Option<Collection>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(collection) = inner.collections.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            collection.title = title;
        }
        if let Some(description) = patch.description {
            collection.description = Some(description);
        }
        Ok(Some(collection.clone()))
    }

    async fn delete_collection(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        inner.prompts.retain(|_, p| p.collection_id != id);
        Ok(inner.collections.remove(&id).is_some())
    }

    async fn list_prompts(&self, collection_id: i64) -> Result<Vec<Prompt>, StoreError> {
        Ok(sorted_prompts(&*self.inner.read().await, collection_id))
    }

    async fn get_prompt(&self, id: i64) -> Result<Option<Prompt>, StoreError> {
        Ok(self.inner.read().await.prompts.get(&id).cloned())
    }

    async fn create_prompt(&self, new: NewPrompt) -> Result<Prompt, StoreError> {
        let mut inner = self.inner.write().await;
        // Append position is computed under the same lock as the insert.
        let order = match new.order {
            Some(order) => order,
            None => inner
                .prompts
                .values()
                .filter(|p| p.collection_id == new.collection_id)
                .count() as i64,
        };

        let id = inner.next_prompt_id;
        inner.next_prompt_id += 1;

        let prompt = Prompt {
            id,
            content: new.content,
            collection_id: new.collection_id,
            order,
        };
        inner.prompts.insert(id, prompt.clone());
        Ok(prompt)
    }

    async fn update_prompt(
        &self,
        id: i64,
        patch: PromptPatch,
    ) -> Result<Option<Prompt>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(prompt) = inner.prompts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(content) = patch.content {
            prompt.content = content;
        }
        if let Some(order) = patch.order {
            prompt.order = order;
        }
        Ok(Some(prompt.clone()))
    }

    async fn delete_prompt(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.prompts.remove(&id).is_some())
    }

    async fn reorder_prompts(
        &self,
        collection_id: i64,
        prompt_ids: &[i64],
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        for (position, prompt_id) in prompt_ids.iter().enumerate() {
            // Ids outside the collection (or unknown) are ignored.
            if let Some(prompt) = inner.prompts.get_mut(prompt_id) {
                if prompt.collection_id == collection_id {
                    prompt.order = position as i64;
                }
            }
        }
        Ok(())
    }

    async fn is_seeded(&self) -> Result<bool, StoreError> {
        Ok(!self.inner.read().await.collections.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collection_with_prompts(store: &MemStore, n: usize) -> (i64, Vec<i64>) {
        let collection = store
            .create_collection(NewCollection {
                title: "Writing".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let mut ids = Vec::new();
        for i in 0..n {
            let prompt = store
                .create_prompt(NewPrompt {
                    content: format!("prompt {i}"),
                    collection_id: collection.id,
                    order: None,
                })
                .await
                .unwrap();
            ids.push(prompt.id);
        }
        (collection.id, ids)
    }

    #[tokio::test]
    async fn create_prompt_appends_to_end() {
        let store = MemStore::new();
        let (collection_id, ids) = collection_with_prompts(&store, 3).await;

        let orders: Vec<i64> = store
            .list_prompts(collection_id)
            .await
            .unwrap()
            .iter()
            .map(|p| p.order)
            .collect();
        assert_eq!(orders, vec![0, 1, 2]);

        let appended = store
            .create_prompt(NewPrompt {
                content: "fourth".to_string(),
                collection_id,
                order: None,
            })
            .await
            .unwrap();
        assert_eq!(appended.order, 3);
        assert!(!ids.contains(&appended.id));
    }

    #[tokio::test]
    async fn explicit_order_zero_is_not_append() {
        let store = MemStore::new();
        let (collection_id, _) = collection_with_prompts(&store, 2).await;

        let first = store
            .create_prompt(NewPrompt {
                content: "goes first".to_string(),
                collection_id,
                order: Some(0),
            })
            .await
            .unwrap();
        assert_eq!(first.order, 0);
    }

    #[tokio::test]
    async fn reorder_assigns_positions_in_sequence_order() {
        let store = MemStore::new();
        let (collection_id, ids) = collection_with_prompts(&store, 3).await;
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        store
            .reorder_prompts(collection_id, &[c, a, b])
            .await
            .unwrap();

        let listed: Vec<i64> = store
            .list_prompts(collection_id)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(listed, vec![c, a, b]);

        assert_eq!(store.get_prompt(c).await.unwrap().unwrap().order, 0);
        assert_eq!(store.get_prompt(a).await.unwrap().unwrap().order, 1);
        assert_eq!(store.get_prompt(b).await.unwrap().unwrap().order, 2);
    }

    #[tokio::test]
    async fn reorder_orders_are_contiguous_after_full_permutation() {
        let store = MemStore::new();
        let (collection_id, mut ids) = collection_with_prompts(&store, 5).await;
        ids.reverse();

        store.reorder_prompts(collection_id, &ids).await.unwrap();

        let orders: Vec<i64> = store
            .list_prompts(collection_id)
            .await
            .unwrap()
            .iter()
            .map(|p| p.order)
            .collect();
        assert_eq!(orders, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn reorder_ignores_foreign_ids() {
        let store = MemStore::new();
        let (collection_id, ids) = collection_with_prompts(&store, 2).await;
        let (other_id, other_ids) = collection_with_prompts(&store, 1).await;

        store
            .reorder_prompts(collection_id, &[9999, ids[1], other_ids[0], ids[0]])
            .await
            .unwrap();

        // Foreign and unknown ids are skipped; positions still follow the
        // sequence index, so ids[1] gets 1 and ids[0] gets 3.
        assert_eq!(store.get_prompt(ids[1]).await.unwrap().unwrap().order, 1);
        assert_eq!(store.get_prompt(ids[0]).await.unwrap().unwrap().order, 3);
        // The other collection's prompt is untouched.
        assert_eq!(
            store.get_prompt(other_ids[0]).await.unwrap().unwrap().order,
            0
        );
        assert_eq!(store.list_prompts(other_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_collection_cascades_to_prompts() {
        let store = MemStore::new();
        let (collection_id, ids) = collection_with_prompts(&store, 3).await;
        let (other_id, other_ids) = collection_with_prompts(&store, 1).await;

        assert!(store.delete_collection(collection_id).await.unwrap());

        assert!(store.list_prompts(collection_id).await.unwrap().is_empty());
        for id in ids {
            assert!(store.get_prompt(id).await.unwrap().is_none());
        }
        // Unrelated collection survives.
        assert!(store.get_prompt(other_ids[0]).await.unwrap().is_some());
        assert_eq!(store.list_prompts(other_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn content_only_update_keeps_order() {
        let store = MemStore::new();
        let (_, ids) = collection_with_prompts(&store, 3).await;

        let updated = store
            .update_prompt(
                ids[1],
                PromptPatch {
                    content: Some("rewritten".to_string()),
                    order: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.content, "rewritten");
        assert_eq!(updated.order, 1);
    }

    #[tokio::test]
    async fn delete_missing_prompt_reports_not_found() {
        let store = MemStore::new();
        assert!(!store.delete_prompt(42).await.unwrap());
        assert!(!store.delete_collection(42).await.unwrap());
    }

    #[tokio::test]
    async fn update_missing_collection_is_none() {
        let store = MemStore::new();
        let patch = CollectionPatch {
            title: Some("nope".to_string()),
            description: None,
        };
        assert!(store.update_collection(7, patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn partial_collection_update_merges_fields() {
        let store = MemStore::new();
        let collection = store
            .create_collection(NewCollection {
                title: "Research".to_string(),
                description: Some("original".to_string()),
            })
            .await
            .unwrap();

        let updated = store
            .update_collection(
                collection.id,
                CollectionPatch {
                    title: None,
                    description: Some("revised".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Research");
        assert_eq!(updated.description.as_deref(), Some("revised"));
    }
}
