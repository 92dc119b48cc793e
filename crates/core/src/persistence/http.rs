use reqwest::StatusCode;

use super::gateway::{PageGateway, PersistenceError};
use crate::page::{ApiResponse, PageRecord, SaveContentRequest};

/// [`PageGateway`] speaking to the page API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPageGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPageGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn page_url(&self, page_id: &str) -> String {
        format!("{}/v1/pages/{page_id}", self.base_url)
    }
}

impl PageGateway for HttpPageGateway {
    async fn load(&self, page_id: &str) -> Result<String, PersistenceError> {
        let response = self.client.get(self.page_url(page_id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(PersistenceError::NotFound(page_id.to_string()));
        }
        let record = unwrap_response(response.json::<ApiResponse<PageRecord>>().await?)?;
        Ok(record.content)
    }

    async fn save(&self, page_id: &str, content: String) -> Result<PageRecord, PersistenceError> {
        let url = format!("{}/content", self.page_url(page_id));
        tracing::debug!(page_id, bytes = content.len(), "saving page content");
        let response = self
            .client
            .put(url)
            .json(&SaveContentRequest { content })
            .send()
            .await?;
        unwrap_response(response.json::<ApiResponse<PageRecord>>().await?)
    }
}

fn unwrap_response(response: ApiResponse<PageRecord>) -> Result<PageRecord, PersistenceError> {
    match response {
        ApiResponse {
            success: true,
            data: Some(record),
            ..
        } => Ok(record),
        ApiResponse { error, .. } => Err(PersistenceError::Rejected(
            error.unwrap_or_else(|| "unknown error".to_string()),
        )),
    }
}
