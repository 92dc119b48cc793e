use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

use super::debounce::Debouncer;
use super::gateway::{PageGateway, PersistenceError};
use crate::document::config::BlockKind;
use crate::document::model::{Block, ContentDocument};
use crate::document::normalize;
use crate::document::validate::DocumentError;
use crate::events::types::{SaveEvent, SaveFailedEvent, SavedEvent};
use crate::events::{EditorEvent, EventBus};
use crate::layout::Float;
use crate::page::PageRecord;
use crate::repository::{BlockPatch, BlockRepository};

/// Delay between the last reorder and the automatic save it triggers.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(500);

/// One author editing one page.
///
/// Mutations are applied to the in-memory repository immediately. Reorders
/// schedule a debounced save; [`EditorSession::save`] overwrites at once.
/// A failed save leaves the in-memory blocks untouched so it can be retried.
pub struct EditorSession<G: PageGateway> {
    page_id: String,
    repository: BlockRepository,
    gateway: Arc<G>,
    autosave: Debouncer,
    events: EventBus,
    revision: u64,
    saved_revision: Arc<AtomicU64>,
}

impl<G: PageGateway> EditorSession<G> {
    pub fn new(
        page_id: impl Into<String>,
        document: ContentDocument,
        gateway: Arc<G>,
        autosave_delay: Duration,
        events: EventBus,
    ) -> Self {
        Self {
            page_id: page_id.into(),
            repository: BlockRepository::from_document(document),
            gateway,
            autosave: Debouncer::new(autosave_delay),
            events,
            revision: 0,
            saved_revision: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Load a page through the gateway and normalize whatever it stored.
    pub async fn open(
        gateway: Arc<G>,
        page_id: &str,
        autosave_delay: Duration,
        events: EventBus,
    ) -> Result<Self, PersistenceError> {
        let raw = gateway.load(page_id).await?;
        let document = normalize(&raw);
        tracing::info!(page_id, blocks = document.blocks.len(), "page opened for editing");
        Ok(Self::new(page_id, document, gateway, autosave_delay, events))
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn repository(&self) -> &BlockRepository {
        &self.repository
    }

    pub fn blocks(&self) -> &[Block] {
        self.repository.blocks()
    }

    /// Whether edits exist that no successful save has captured yet.
    pub fn has_unsaved_changes(&self) -> bool {
        self.saved_revision.load(Ordering::SeqCst) != self.revision
    }

    pub fn is_autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    pub fn add(&mut self, kind: BlockKind) -> &Block {
        self.revision += 1;
        self.repository.add(kind)
    }

    pub fn update(&mut self, id: &str, patch: BlockPatch) -> bool {
        self.touch(|repo| repo.update(id, patch))
    }

    pub fn merge_config(&mut self, id: &str, changes: Value) -> Result<bool, DocumentError> {
        let changed = self.repository.merge_config(id, changes)?;
        if changed {
            self.revision += 1;
        }
        Ok(changed)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.touch(|repo| repo.delete(id))
    }

    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        self.touch(|repo| repo.toggle_visibility(id))
    }

    pub fn duplicate(&mut self, id: &str) -> bool {
        self.touch(|repo| repo.duplicate(id).is_some())
    }

    pub fn set_image_float(&mut self, block_id: &str, index: usize, float: Float) -> bool {
        self.touch(|repo| repo.set_image_float(block_id, index, float))
    }

    pub fn set_image_width(&mut self, block_id: &str, index: usize, width: &str) -> bool {
        self.touch(|repo| repo.set_image_width(block_id, index, width))
    }

    /// Reorder and schedule a debounced save of the result.
    pub fn reorder<S: AsRef<str>>(&mut self, active_sequence: &[S]) {
        self.repository.reorder(active_sequence);
        self.revision += 1;
        self.schedule_autosave();
    }

    /// Overwrite the stored page with the current blocks now. Any pending
    /// autosave is cancelled first.
    pub async fn save(&mut self) -> Result<PageRecord, PersistenceError> {
        self.autosave.cancel();
        let revision = self.revision;
        let document = ContentDocument::stamped(self.repository.blocks().to_vec(), Utc::now());

        let result = persist(
            self.gateway.as_ref(),
            &self.page_id,
            &document,
            &self.events,
            false,
        )
        .await;
        if result.is_ok() {
            self.saved_revision.fetch_max(revision, Ordering::SeqCst);
        }
        result
    }

    fn touch(&mut self, op: impl FnOnce(&mut BlockRepository) -> bool) -> bool {
        let changed = op(&mut self.repository);
        if changed {
            self.revision += 1;
        }
        changed
    }

    fn schedule_autosave(&mut self) {
        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();
        let page_id = self.page_id.clone();
        let saved_revision = Arc::clone(&self.saved_revision);
        let revision = self.revision;
        let blocks = self.repository.blocks().to_vec();

        let scheduled = self.autosave.schedule(async move {
            let document = ContentDocument::stamped(blocks, Utc::now());
            if persist(gateway.as_ref(), &page_id, &document, &events, true)
                .await
                .is_ok()
            {
                saved_revision.fetch_max(revision, Ordering::SeqCst);
            }
        });

        if scheduled {
            self.events.publish(EditorEvent::AutosaveScheduled(SaveEvent {
                page_id: self.page_id.clone(),
                delay_ms: self.autosave.delay().as_millis() as u64,
            }));
        }
    }
}

/// Serialize and overwrite, reporting the outcome on the event bus.
async fn persist<G: PageGateway>(
    gateway: &G,
    page_id: &str,
    document: &ContentDocument,
    events: &EventBus,
    automatic: bool,
) -> Result<PageRecord, PersistenceError> {
    let outcome = match document.to_json() {
        Ok(content) => gateway.save(page_id, content).await,
        Err(err) => Err(err.into()),
    };

    match &outcome {
        Ok(record) => {
            tracing::info!(page_id, blocks = document.blocks.len(), automatic, "page saved");
            events.publish(EditorEvent::Saved(SavedEvent {
                page_id: page_id.to_string(),
                block_count: document.blocks.len(),
                updated_at: record.updated_at,
                automatic,
            }));
        }
        Err(err) => {
            tracing::error!(page_id, automatic, error = %err, "page save failed");
            events.publish(EditorEvent::SaveFailed(SaveFailedEvent {
                page_id: page_id.to_string(),
                message: err.to_string(),
                automatic,
            }));
        }
    }
    outcome
}
