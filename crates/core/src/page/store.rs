use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;

use super::model::PageRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("page not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage for page content. Every write replaces the whole content string;
/// concurrent writers resolve last-write-wins.
#[derive(Debug, Clone)]
pub enum PageStore {
    Postgres(PgPool),
    Memory(Arc<RwLock<HashMap<String, PageRecord>>>),
}

impl PageStore {
    pub fn postgres(pool: PgPool) -> Self {
        PageStore::Postgres(pool)
    }

    pub fn in_memory() -> Self {
        PageStore::Memory(Arc::default())
    }

    pub fn backend(&self) -> &'static str {
        match self {
            PageStore::Postgres(_) => "postgres",
            PageStore::Memory(_) => "memory",
        }
    }

    pub async fn get(&self, id: &str) -> Result<PageRecord, StoreError> {
        let found = match self {
            PageStore::Postgres(pool) => {
                sqlx::query_as::<_, PageRecord>(
                    "SELECT id, content, updated_at FROM pages WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(pool)
                .await?
            }
            PageStore::Memory(pages) => pages.read().await.get(id).cloned(),
        };
        found.ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Create or overwrite the content of page `id`.
    pub async fn put(&self, id: &str, content: String) -> Result<PageRecord, StoreError> {
        let record = match self {
            PageStore::Postgres(pool) => {
                sqlx::query_as::<_, PageRecord>(
                    "INSERT INTO pages (id, content, updated_at) VALUES ($1, $2, now()) \
                     ON CONFLICT (id) DO UPDATE SET content = EXCLUDED.content, updated_at = EXCLUDED.updated_at \
                     RETURNING id, content, updated_at",
                )
                .bind(id)
                .bind(content)
                .fetch_one(pool)
                .await?
            }
            PageStore::Memory(pages) => {
                let record = PageRecord {
                    id: id.to_string(),
                    content,
                    updated_at: Utc::now(),
                };
                pages.write().await.insert(id.to_string(), record.clone());
                record
            }
        };
        tracing::debug!(page_id = id, bytes = record.content.len(), "page content stored");
        Ok(record)
    }

    /// Remove a page and its content. Returns whether it existed.
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let removed = match self {
            PageStore::Postgres(pool) => {
                sqlx::query("DELETE FROM pages WHERE id = $1")
                    .bind(id)
                    .execute(pool)
                    .await?
                    .rows_affected()
                    > 0
            }
            PageStore::Memory(pages) => pages.write().await.remove(id).is_some(),
        };
        Ok(removed)
    }

    /// Verify the backend is reachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        if let PageStore::Postgres(pool) = self {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}
