use std::path::Path;

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};
use tokio::sync::Mutex;

use super::{
    Collection, CollectionPatch, NewCollection, NewPrompt, Prompt, PromptPatch, Store, StoreError,
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS collections (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    description TEXT
);
CREATE TABLE IF NOT EXISTS prompts (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    content       TEXT NOT NULL,
    collection_id INTEGER NOT NULL,
    position      INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_prompts_collection ON prompts(collection_id);
";

/// Persistent store on SQLite. The `position` column backs the wire-level
/// `order` field. Multi-step writes (cascade delete, reorder, append-position
/// computation) run inside a single transaction.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn collection_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Collection> {
    Ok(Collection {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
    })
}

fn prompt_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Prompt> {
    Ok(Prompt {
        id: row.get(0)?,
        content: row.get(1)?,
        collection_id: row.get(2)?,
        order: row.get(3)?,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn list_collections(&self) -> Result<Vec<Collection>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare("SELECT id, title, description FROM collections ORDER BY id")?;
        let collections = stmt
            .query_map([], collection_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(collections)
    }

    async fn get_collection(&self, id: i64) -> Result<Option<Collection>, StoreError> {
        let conn = self.conn.lock().await;
        let collection = conn
            .query_row(
                "SELECT id, title, description FROM collections WHERE id = ?1",
                params![id],
                collection_from_row,
            )
            .optional()?;
        Ok(collection)
    }

    async fn create_collection(&self, new: NewCollection) -> Result<Collection, StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO collections (title, description) VALUES (?1, ?2)",
            params![new.title, new.description],
        )?;
        Ok(Collection {
            id: conn.last_insert_rowid(),
            title: new.title,
            description: new.description,
        })
    }

    async fn update_collection(
        &self,
        id: i64,
        patch: CollectionPatch,
    ) -> Result<Option<Collection>, StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let Some(mut collection) = tx
            .query_row(
                "SELECT id, title, description FROM collections WHERE id = ?1",
                params![id],
                collection_from_row,
            )
            .optional()?
        else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            collection.title = title;
        }
        if let Some(description) = patch.description {
            collection.description = Some(description);
        }
        tx.execute(
            "UPDATE collections SET title = ?1, description = ?2 WHERE id = ?3",
            params![collection.title, collection.description, id],
        )?;
        tx.commit()?;
        Ok(Some(collection))
    }

    async fn delete_collection(&self, id: i64) -> Result<bool, StoreError> {
        let mut conn = self.conn.lock().await;
        // Cascade and collection removal commit together or not at all.
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM prompts WHERE collection_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM collections WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(deleted > 0)
    }

    async fn list_prompts(&self, collection_id: i64) -> Result<Vec<Prompt>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, content, collection_id, position FROM prompts \
             WHERE collection_id = ?1 ORDER BY position, id",
        )?;
        let prompts = stmt
            .query_map(params![collection_id], prompt_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(prompts)
    }

    async fn get_prompt(&self, id: i64) -> Result<Option<Prompt>, StoreError> {
        let conn = self.conn.lock().await;
        let prompt = conn
            .query_row(
                "SELECT id, content, collection_id, position FROM prompts WHERE id = ?1",
                params![id],
                prompt_from_row,
            )
            .optional()?;
        Ok(prompt)
    }

    async fn create_prompt(&self, new: NewPrompt) -> Result<Prompt, StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        // Append position is computed inside the same transaction as the
        // insert, so concurrent creates cannot observe a stale count.
        let order = match new.order {
            Some(order) => order,
            None => tx.query_row(
                "SELECT COUNT(*) FROM prompts WHERE collection_id = ?1",
                params![new.collection_id],
                |row| row.get::<_, i64>(0),
            )?,
        };

        tx.execute(
            "INSERT INTO prompts (content, collection_id, position) VALUES (?1, ?2, ?3)",
            params![new.content, new.collection_id, order],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Prompt {
            id,
            content: new.content,
            collection_id: new.collection_id,
            order,
        })
    }

    async fn update_prompt(
        &self,
        id: i64,
        patch: PromptPatch,
    ) -> Result<Option<Prompt>, StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let Some(mut prompt) = tx
            .query_row(
                "SELECT id, content, collection_id, position FROM prompts WHERE id = ?1",
                params![id],
                prompt_from_row,
            )
            .optional()?
        else {
            return Ok(None);
        };

        if let Some(content) = patch.content {
            prompt.content = content;
        }
        if let Some(order) = patch.order {
            prompt.order = order;
        }
        tx.execute(
            "UPDATE prompts SET content = ?1, position = ?2 WHERE id = ?3",
            params![prompt.content, prompt.order, id],
        )?;
        tx.commit()?;
        Ok(Some(prompt))
    }

    async fn delete_prompt(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock().await;
        let deleted = conn.execute("DELETE FROM prompts WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    async fn reorder_prompts(
        &self,
        collection_id: i64,
        prompt_ids: &[i64],
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        for (position, prompt_id) in prompt_ids.iter().enumerate() {
            // The collection_id guard makes foreign and unknown ids no-ops.
            tx.execute(
                "UPDATE prompts SET position = ?1 WHERE id = ?2 AND collection_id = ?3",
                params![position as i64, prompt_id, collection_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    async fn is_seeded(&self) -> Result<bool, StoreError> {
        let conn = self.conn.lock().await;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM collections", [], |row| row.get(0))?;
        Ok(count > 0)
    }
}
