//! Raw blob endpoints over the locked file store.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{handlers::AppError, state::AppState};

/// POST /api/files/{name}
#[axum::debug_handler]
pub async fn create_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    state.files.create(&name, &body).await?;
    Ok(StatusCode::CREATED)
}

/// GET /api/files/{name}
#[axum::debug_handler]
pub async fn read_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Vec<u8>, AppError> {
    Ok(state.files.read(&name).await?)
}

/// PUT /api/files/{name}
#[axum::debug_handler]
pub async fn update_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    state.files.update(&name, &body).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/files/{name}
#[axum::debug_handler]
pub async fn delete_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    state.files.delete(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}
