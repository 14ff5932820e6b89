//! Canvas editor: interaction state bound to a category backend.

use super::backend::CategoryBackend;
use super::geometry::Vec2;
use super::scene::{layout, scene, PlacedNode, Scene};
use super::state::{CanvasAction, CanvasState, PointerButton};
use crate::errors::AppError;
use crate::models::{Category, CreateCategoryRequest, UpdateCategoryRequest};

/// One open editor. Input handlers never fail: backend errors land in the
/// state's error banner.
pub struct CanvasEditor<B: CategoryBackend> {
    backend: B,
    state: CanvasState,
    categories: Vec<Category>,
}

impl<B: CategoryBackend> CanvasEditor<B> {
    /// Open the editor. Non-admin viewers are refused.
    pub async fn open(backend: B) -> Result<Self, AppError> {
        if !backend.is_admin() {
            return Err(AppError::admin_required());
        }

        let categories = backend.list_categories().await?;
        tracing::debug!(count = categories.len(), "Canvas editor opened");

        Ok(Self {
            backend,
            state: CanvasState::new(),
            categories,
        })
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CanvasState {
        &mut self.state
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Replace the category list with a fresh snapshot.
    pub fn apply_snapshot(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }

    pub async fn refresh(&mut self) -> Result<(), AppError> {
        let categories = self.backend.list_categories().await?;
        self.apply_snapshot(categories);
        Ok(())
    }

    pub fn nodes(&self) -> Vec<PlacedNode> {
        layout(&self.categories)
    }

    pub fn scene(&self) -> Scene {
        scene(&self.state, &self.categories)
    }

    // ==================== INPUT ====================

    pub async fn pointer_down(&mut self, screen: Vec2, button: PointerButton) {
        let nodes = self.nodes();
        if let Some(action) = self.state.pointer_down(screen, button, &nodes) {
            self.dispatch(action).await;
        }
    }

    pub async fn pointer_move(&mut self, screen: Vec2) {
        if let Some(action) = self.state.pointer_move(screen) {
            self.dispatch(action).await;
        }
    }

    pub fn pointer_up(&mut self) {
        self.state.pointer_up();
    }

    pub fn double_click(&mut self, screen: Vec2) {
        let nodes = self.nodes();
        self.state.double_click(screen, &nodes);
    }

    pub async fn commit_rename(&mut self) {
        if let Some(action) = self.state.commit_rename() {
            self.dispatch(action).await;
        }
    }

    pub async fn confirm_create(&mut self) {
        if let Some(action) = self.state.confirm_create() {
            self.dispatch(action).await;
        }
    }

    pub async fn disconnect_selected(&mut self) {
        if let Some(action) = self.state.disconnect_selected() {
            self.dispatch(action).await;
        }
    }

    pub async fn delete_selected(&mut self) {
        if let Some(action) = self.state.delete_selected() {
            self.dispatch(action).await;
        }
    }

    /// Send one action to the backend. Returns whether it succeeded.
    pub async fn dispatch(&mut self, action: CanvasAction) -> bool {
        self.state.dismiss_error();

        if let Err(e) = self.send(&action).await {
            tracing::warn!(?action, "Canvas action failed: {}", e);
            self.state.set_error(e.message());
            return false;
        }

        self.state.action_succeeded(&action);
        if let Err(e) = self.refresh().await {
            self.state.set_error(e.message());
        }
        true
    }

    async fn send(&self, action: &CanvasAction) -> Result<(), AppError> {
        match action {
            CanvasAction::MoveNode { id, position } => {
                self.backend
                    .update_category(id, UpdateCategoryRequest::move_to(position.x, position.y))
                    .await
            }
            CanvasAction::SetParent { child, parent } => {
                self.backend
                    .update_category(child, UpdateCategoryRequest::set_parent(parent.as_str()))
                    .await
            }
            CanvasAction::ClearParent { id } => {
                self.backend
                    .update_category(id, UpdateCategoryRequest::clear_parent())
                    .await
            }
            CanvasAction::Rename { id, name } => {
                self.backend
                    .update_category(id, UpdateCategoryRequest::rename(name.as_str()))
                    .await
            }
            CanvasAction::Create { name, position } => {
                let request = CreateCategoryRequest {
                    name: name.clone(),
                    parent_id: None,
                    x: Some(position.x),
                    y: Some(position.y),
                };
                self.backend.create_category(request).await.map(|_| ())
            }
            CanvasAction::Delete { id } => self.backend.delete_category(id).await,
        }
    }
}
