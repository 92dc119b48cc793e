use axum::extract::DefaultBodyLimit;
use tower_http::limit::RequestBodyLimitLayer;

/// Largest accepted request body. Page content is saved whole, so this bounds
/// a single document.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Rejects oversized bodies with `413` before any handler runs.
pub fn body_limit_layer() -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(MAX_BODY_BYTES)
}

/// Raises the limit axum's own extractors (`Json`, `String`, ...) enforce,
/// which otherwise stops at 2 MB.
pub fn extractor_limit_layer() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_BODY_BYTES)
}
