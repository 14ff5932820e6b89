//! Directory operations with access control applied.
//!
//! HTTP handlers and in-process clients (the canvas editor) both go through
//! [`Directory`], so every mutating tool/category operation is gated in one
//! place and the gate runs before the store is touched.

use std::sync::Arc;

use crate::auth::{AdminGate, Viewer};
use crate::db::{sample_tools, Repository};
use crate::errors::AppError;
use crate::listing::{ToolFilter, ToolListing, ToolQuery};
use crate::models::{
    Category, CategoryCreated, CreateCategoryRequest, CreateToolRequest, SeedResult, Tool,
    ToolCreated, UpdateCategoryRequest, UpdateToolRequest, UpvoteResult,
};

#[derive(Clone)]
pub struct Directory {
    repo: Arc<Repository>,
    gate: AdminGate,
}

impl Directory {
    pub fn new(repo: Arc<Repository>, gate: AdminGate) -> Self {
        Self { repo, gate }
    }

    pub fn repo(&self) -> &Arc<Repository> {
        &self.repo
    }

    pub fn is_admin(&self, viewer: &Viewer) -> bool {
        self.gate.is_admin(viewer)
    }

    // ==================== TOOLS ====================

    pub async fn list_tools(
        &self,
        viewer: &Viewer,
        query: &ToolQuery,
    ) -> Result<ToolListing, AppError> {
        let tools = self.repo.list_tools().await?;
        let filter = ToolFilter::new(query, self.is_admin(viewer));
        Ok(filter.apply(&tools))
    }

    pub async fn get_tool(&self, id: &str) -> Result<Option<Tool>, AppError> {
        self.repo.get_tool(id).await
    }

    pub async fn create_tool(
        &self,
        viewer: &Viewer,
        request: &CreateToolRequest,
    ) -> Result<ToolCreated, AppError> {
        self.gate.require_admin(viewer)?;

        if request.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }

        let tool = self.repo.create_tool(request).await?;
        tracing::info!(tool_id = %tool.id, title = %tool.title, "Tool created");
        Ok(ToolCreated { tool_id: tool.id })
    }

    pub async fn update_tool(
        &self,
        viewer: &Viewer,
        id: &str,
        request: &UpdateToolRequest,
    ) -> Result<Tool, AppError> {
        self.gate.require_admin(viewer)?;
        let tool = self.repo.update_tool(id, request).await?;
        tracing::info!(tool_id = %id, "Tool updated");
        Ok(tool)
    }

    pub async fn delete_tool(&self, viewer: &Viewer, id: &str) -> Result<(), AppError> {
        self.gate.require_admin(viewer)?;
        self.repo.delete_tool(id).await?;
        tracing::info!(tool_id = %id, "Tool deleted");
        Ok(())
    }

    /// Public: anyone may upvote, as often as they like.
    pub async fn upvote_tool(&self, id: &str) -> Result<UpvoteResult, AppError> {
        let upvotes = self.repo.upvote_tool(id).await?;
        Ok(UpvoteResult { upvotes })
    }

    /// Public and idempotent: inserts the sample catalogue into an empty table.
    pub async fn seed_tools(&self) -> Result<SeedResult, AppError> {
        let seeded = self.repo.seed_tools(&sample_tools()).await?;
        if seeded > 0 {
            tracing::info!(seeded, "Seeded sample tools");
        }
        Ok(SeedResult { seeded })
    }

    // ==================== CATEGORIES ====================

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.repo.list_categories().await
    }

    pub async fn create_category(
        &self,
        viewer: &Viewer,
        request: &CreateCategoryRequest,
    ) -> Result<CategoryCreated, AppError> {
        self.gate.require_admin(viewer)?;

        if request.name.trim().is_empty() {
            return Err(AppError::Validation("Category name is required".to_string()));
        }

        let category = self.repo.create_category(request).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(CategoryCreated {
            category_id: category.id,
        })
    }

    pub async fn update_category(
        &self,
        viewer: &Viewer,
        id: &str,
        request: &UpdateCategoryRequest,
    ) -> Result<Category, AppError> {
        self.gate.require_admin(viewer)?;
        let category = self.repo.update_category(id, request).await?;
        tracing::debug!(category_id = %id, "Category updated");
        Ok(category)
    }

    pub async fn delete_category(&self, viewer: &Viewer, id: &str) -> Result<(), AppError> {
        self.gate.require_admin(viewer)?;
        self.repo.delete_category(id).await?;
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}
