use std::sync::Arc;

use blockpage_core::events::EventBus;
use blockpage_core::page::PageStore;
use blockpage_render::{MediaResolver, Renderer};

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    store: PageStore,
    config: AppConfig,
    renderer: Renderer,
    event_bus: EventBus,
}

impl AppState {
    pub fn new(store: PageStore, config: AppConfig, event_bus: EventBus) -> Self {
        let renderer = Renderer::new(MediaResolver::new(config.media_origin.clone()));
        Self {
            inner: Arc::new(InnerState {
                store,
                config,
                renderer,
                event_bus,
            }),
        }
    }

    pub fn store(&self) -> &PageStore {
        &self.inner.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn renderer(&self) -> &Renderer {
        &self.inner.renderer
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }
}
