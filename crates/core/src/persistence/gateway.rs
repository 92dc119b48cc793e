use std::future::Future;

use thiserror::Error;

use crate::page::PageRecord;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The gateway answered `success: false`.
    #[error("save rejected: {0}")]
    Rejected(String),

    #[error("page not found: {0}")]
    NotFound(String),

    #[error("could not serialize document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Load and overwrite a page's serialized content.
///
/// Writes always replace the whole content string; there is no partial save
/// and no revision check.
pub trait PageGateway: Send + Sync + 'static {
    /// Fetch the raw stored content string of a page.
    fn load(&self, page_id: &str) -> impl Future<Output = Result<String, PersistenceError>> + Send;

    /// Overwrite a page's content.
    fn save(
        &self,
        page_id: &str,
        content: String,
    ) -> impl Future<Output = Result<PageRecord, PersistenceError>> + Send;
}
