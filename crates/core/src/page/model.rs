use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A page's stored content. `content` holds the serialized (possibly legacy)
/// document string; it is only ever interpreted through the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub id: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

/// Body of an overwrite request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveContentRequest {
    pub content: String,
}

/// Response envelope of the persistence gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
