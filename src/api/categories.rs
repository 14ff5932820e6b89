//! Category API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::auth::Viewer;
use crate::models::{Category, CategoryCreated, CreateCategoryRequest, UpdateCategoryRequest};
use crate::AppState;

/// GET /api/categories - List all categories in creation order.
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.directory.list_categories().await {
        Ok(categories) => success(categories, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/categories - Create a category (admin only).
pub async fn create_category(
    State(state): State<AppState>,
    viewer: Viewer,
    Json(request): Json<CreateCategoryRequest>,
) -> ApiResult<CategoryCreated> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.directory.create_category(&viewer, &request).await {
        Ok(created) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(created, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PATCH /api/categories/:id - Rename, move or re-parent a category (admin only).
pub async fn update_category(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
    Json(request): Json<UpdateCategoryRequest>,
) -> ApiResult<Category> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.directory.update_category(&viewer, &id, &request).await {
        Ok(category) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(category, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/categories/:id - Delete a leaf category (admin only).
pub async fn delete_category(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.directory.delete_category(&viewer, &id).await {
        Ok(()) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
