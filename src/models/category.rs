//! Category model: a self-referential forest with canvas coordinates.

use serde::{Deserialize, Serialize};

use super::Patch;

/// A category node. `parent_id` points into the same table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub created_at: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Request body for creating a new category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// Request body for patching a category. `parentId: null` detaches the node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub parent_id: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub x: Patch<f64>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub y: Patch<f64>,
}

impl UpdateCategoryRequest {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Patch::Value(name.into()),
            ..Default::default()
        }
    }

    pub fn set_parent(parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: Patch::Value(parent_id.into()),
            ..Default::default()
        }
    }

    pub fn clear_parent() -> Self {
        Self {
            parent_id: Patch::Null,
            ..Default::default()
        }
    }

    pub fn move_to(x: f64, y: f64) -> Self {
        Self {
            x: Patch::Value(x),
            y: Patch::Value(y),
            ..Default::default()
        }
    }
}

/// Response body of a category creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreated {
    pub category_id: String,
}
