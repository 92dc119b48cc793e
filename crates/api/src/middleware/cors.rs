use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Build the CORS layer. Any origin may read rendered pages and save content;
/// only the methods the page routes use are allowed.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}
