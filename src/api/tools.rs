//! Tool API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::auth::Viewer;
use crate::errors::AppError;
use crate::listing::{ToolListing, ToolQuery};
use crate::models::{
    CreateToolRequest, SeedResult, Tool, ToolCreated, UpdateToolRequest, UpvoteResult,
};
use crate::AppState;

/// GET /api/tools - List tools with optional filters.
pub async fn list_tools(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(query): Query<ToolQuery>,
) -> ApiResult<ToolListing> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.directory.list_tools(&viewer, &query).await {
        Ok(listing) => success(listing, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/tools/:id - Get a single tool.
pub async fn get_tool(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Tool> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.directory.get_tool(&id).await {
        Ok(Some(tool)) => success(tool, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Tool {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/tools - Create a new tool (admin only).
pub async fn create_tool(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(request): Json<CreateToolRequest>,
) -> ApiResult<ToolCreated> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.directory.create_tool(&viewer, &request).await {
        Ok(created) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(created, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PATCH /api/tools/:id - Partially update a tool (admin only).
pub async fn update_tool(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
    Json(request): Json<UpdateToolRequest>,
) -> ApiResult<Tool> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.directory.update_tool(&viewer, &id, &request).await {
        Ok(tool) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(tool, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/tools/:id - Delete a tool (admin only).
pub async fn delete_tool(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.directory.delete_tool(&viewer, &id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/tools/:id/upvote - Add one upvote.
pub async fn upvote_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<UpvoteResult> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.directory.upvote_tool(&id).await {
        Ok(result) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(result, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/tools/seed - Insert the sample catalogue when the table is empty.
pub async fn seed_tools(State(state): State<AppState>) -> ApiResult<SeedResult> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.directory.seed_tools().await {
        Ok(result) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(result, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
