//! Resource CRUD handlers.
//!
//! Reads and writes go through the cache-aside store; successful writes are
//! announced on the SSE side-channel.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use ipvault_core::resource::{
    validate_resource_input, CreateResourceRequest, ListResourcesQuery, Resource, ResourceEvent,
    ResourcePage, UpdateResourceRequest,
};
use ipvault_core::storage::RepositoryError;

use crate::{handlers::AppError, state::AppState};

fn not_found(id: i64) -> AppError {
    AppError::from(RepositoryError::NotFound {
        entity_type: "Resource",
        id: id.to_string(),
    })
}

/// Create a resource (POST /api/resources).
#[axum::debug_handler]
pub async fn create_resource(
    State(state): State<AppState>,
    Json(payload): Json<CreateResourceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = payload.into_input();
    validate_resource_input(&input)?;

    let Some(resource) = state.store.create(&input).await? else {
        return Err(anyhow::anyhow!("Resource could not be created").into());
    };

    tracing::info!(id = resource.id, name = %resource.name, "Created resource");
    state.publish(ResourceEvent::Created {
        resource: resource.clone(),
    });

    Ok((StatusCode::CREATED, Json(resource)))
}

/// List resources (GET /api/resources?page&pageSize&name).
#[axum::debug_handler]
pub async fn list_resources(
    State(state): State<AppState>,
    Query(query): Query<ListResourcesQuery>,
) -> Result<Json<ResourcePage>, AppError> {
    let page = state
        .store
        .get_page(query.page, query.page_size, &query.name)
        .await?;

    Ok(Json(page))
}

/// Get a single resource (GET /api/resources/{id}).
#[axum::debug_handler]
pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Resource>, AppError> {
    let resource = state.store.get_by_id(id).await?.ok_or_else(|| not_found(id))?;

    Ok(Json(resource))
}

/// Update a resource (PATCH /api/resources/{id}).
///
/// Omitted fields keep their current value.
#[axum::debug_handler]
pub async fn update_resource(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateResourceRequest>,
) -> Result<Json<Resource>, AppError> {
    let current = state
        .store
        .get_current_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let input = payload.apply_to(&current);
    validate_resource_input(&input)?;

    let resource = state
        .store
        .update_by_id(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, name = %resource.name, "Updated resource");
    state.publish(ResourceEvent::Updated {
        resource: resource.clone(),
    });

    Ok(Json(resource))
}

/// Delete a resource (DELETE /api/resources/{id}).
///
/// Deleting an unknown id still succeeds.
#[axum::debug_handler]
pub async fn delete_resource(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.store.delete_by_id(id).await?;

    tracing::info!(id, "Deleted resource");
    state.publish(ResourceEvent::Deleted { id });

    Ok(StatusCode::NO_CONTENT)
}
