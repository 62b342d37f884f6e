use axum::{
    Json,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::error;

use shoplist_db::StoreError;
use shoplist_types::api::EntryResponse;
use shoplist_types::models::Entry;

use crate::error::ApiError;
use crate::extract::{Credentials, EntryParams};
use crate::gate::{self, AppState};

/// `GET /entry` — one entry, as bare content (`json=0`) or as JSON.
pub async fn read_entry(
    State(state): State<AppState>,
    credentials: Credentials,
    params: EntryParams,
) -> Result<Response, ApiError> {
    let entry_id = params.entry_id()?;
    gate::admit(&state, credentials).await?;

    let store = state.clone();
    let entry = run_blocking(move || store.entries.get_entry(entry_id)).await?;

    Ok(render(entry, params.wants_plain()))
}

/// `POST /entry` — the body is the new entry's content, authored by the caller.
pub async fn create_entry(
    State(state): State<AppState>,
    credentials: Credentials,
    params: EntryParams,
    body: Bytes,
) -> Result<Response, ApiError> {
    let content = params.decode_body(&body)?;
    let author_id = gate::admit(&state, credentials).await?;

    let store = state.clone();
    let entry = run_blocking(move || store.entries.create_entry(&content, author_id)).await?;

    Ok(render(entry, params.wants_plain()))
}

/// `DELETE /entry` — answers the literal `success`.
pub async fn delete_entry(
    State(state): State<AppState>,
    credentials: Credentials,
    params: EntryParams,
) -> Result<&'static str, ApiError> {
    let entry_id = params.entry_id().map_err(|e| match &params.element_id {
        Some(raw) => ApiError::DeleteFailed(raw.clone()),
        None => e,
    })?;
    gate::admit(&state, credentials).await?;

    let store = state.clone();
    run_blocking(move || {
        store.entries.delete_entry(entry_id).map_err(|e| match e {
            StoreError::NotFound { id, .. } => ApiError::DeleteFailed(id.to_string()),
            other => other.into(),
        })
    })
    .await?;

    Ok("success")
}

/// `GET /list` — every entry, unordered.
pub async fn list_entries(
    State(state): State<AppState>,
    credentials: Credentials,
) -> Result<Json<Vec<EntryResponse>>, ApiError> {
    gate::admit(&state, credentials).await?;

    let store = state.clone();
    let entries = run_blocking(move || store.entries.list_entries()).await?;

    Ok(Json(entries.into_iter().map(EntryResponse::from).collect()))
}

/// Any method the resource does not define.
pub async fn unsupported_method() -> ApiError {
    ApiError::UnsupportedMethod
}

fn render(entry: Entry, plain: bool) -> Response {
    if plain {
        entry.content.into_response()
    } else {
        Json(EntryResponse::from(entry)).into_response()
    }
}

/// Run blocking store work off the async runtime.
async fn run_blocking<F, T, E>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(Into::into)
}
