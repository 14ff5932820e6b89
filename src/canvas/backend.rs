//! The category store as seen by the canvas editor.

use async_trait::async_trait;

use crate::auth::Viewer;
use crate::errors::AppError;
use crate::models::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::service::Directory;

#[async_trait]
pub trait CategoryBackend: Send + Sync {
    /// Whether the editing viewer may mutate categories.
    fn is_admin(&self) -> bool;

    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;

    /// Returns the new category's id.
    async fn create_category(&self, request: CreateCategoryRequest) -> Result<String, AppError>;

    async fn update_category(
        &self,
        id: &str,
        request: UpdateCategoryRequest,
    ) -> Result<(), AppError>;

    async fn delete_category(&self, id: &str) -> Result<(), AppError>;
}

/// In-process backend: the directory service acting for one viewer.
#[derive(Clone)]
pub struct DirectoryBackend {
    directory: Directory,
    viewer: Viewer,
}

impl DirectoryBackend {
    pub fn new(directory: Directory, viewer: Viewer) -> Self {
        Self { directory, viewer }
    }
}

#[async_trait]
impl CategoryBackend for DirectoryBackend {
    fn is_admin(&self) -> bool {
        self.directory.is_admin(&self.viewer)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.directory.list_categories().await
    }

    async fn create_category(&self, request: CreateCategoryRequest) -> Result<String, AppError> {
        let created = self.directory.create_category(&self.viewer, &request).await?;
        Ok(created.category_id)
    }

    async fn update_category(
        &self,
        id: &str,
        request: UpdateCategoryRequest,
    ) -> Result<(), AppError> {
        self.directory
            .update_category(&self.viewer, id, &request)
            .await?;
        Ok(())
    }

    async fn delete_category(&self, id: &str) -> Result<(), AppError> {
        self.directory.delete_category(&self.viewer, id).await
    }
}
