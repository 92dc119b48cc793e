use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Html,
    routing::{get, put},
    Json, Router,
};
use blockpage_core::events::types::SavedEvent;
use blockpage_core::events::EditorEvent;
use blockpage_core::page::{ApiResponse, PageRecord, SaveContentRequest};
use blockpage_core::{normalize, ContentDocument};
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Page content routes: the persistence gateway plus the public render.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/pages/{id}", get(get_page).delete(delete_page))
        .route("/v1/pages/{id}/content", put(save_content))
        .route("/v1/pages/{id}/document", get(get_document))
        .route("/v1/pages/{id}/render", get(render_page))
        .route("/v1/editor/settings", get(editor_settings))
}

async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<PageRecord>>> {
    let record = state.store().get(&id).await?;
    Ok(Json(ApiResponse::ok(record)))
}

/// Overwrite the page's content string. The body is stored as-is: whatever
/// was sent is what the next load hands to the normalizer.
async fn save_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SaveContentRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<PageRecord>>> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let record = state.store().put(&id, request.content).await?;

    let block_count = normalize(&record.content).blocks.len();
    tracing::info!(page_id = %id, block_count, "page content saved");
    state.event_bus().publish(EditorEvent::Saved(SavedEvent {
        page_id: id,
        block_count,
        updated_at: record.updated_at,
        automatic: false,
    }));

    Ok(Json(ApiResponse::ok(record)))
}

async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    if !state.store().delete(&id).await? {
        return Err(ApiError::NotFound(id));
    }
    tracing::info!(page_id = %id, "page deleted");
    Ok(Json(ApiResponse::ok(json!({ "id": id }))))
}

/// The stored content run through the normalizer.
async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ContentDocument>>> {
    let record = state.store().get(&id).await?;
    Ok(Json(ApiResponse::ok(normalize(&record.content))))
}

async fn render_page(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Html<String>> {
    let record = state.store().get(&id).await?;
    let page = state.renderer().render(&normalize(&record.content));
    Ok(Html(page.to_html()))
}

/// Settings an editing client needs to behave like the server renders.
async fn editor_settings(State(state): State<AppState>) -> Json<ApiResponse<Value>> {
    let config = state.config();
    Json(ApiResponse::ok(json!({
        "autosaveDelayMs": config.autosave_delay_ms,
        "mediaOrigin": state.renderer().media().origin(),
        "floatLayoutCss": blockpage_core::layout::FLOAT_LAYOUT_CSS,
    })))
}
