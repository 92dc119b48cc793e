use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events emitted by an editing session, consumed by whatever UI hosts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    /// A debounced save was (re)scheduled; any earlier pending one was dropped.
    AutosaveScheduled(SaveEvent),
    Saved(SavedEvent),
    /// The save failed; the in-memory document is unchanged and can be saved again.
    SaveFailed(SaveFailedEvent),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEvent {
    pub page_id: String,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEvent {
    pub page_id: String,
    pub block_count: usize,
    pub updated_at: DateTime<Utc>,
    /// `true` when the save came from the debounce timer rather than an explicit save.
    pub automatic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFailedEvent {
    pub page_id: String,
    pub message: String,
    pub automatic: bool,
}
