//! Tool model matching the frontend Tool interface.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Patch;
use crate::errors::AppError;

/// Visibility status of a tool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Online,
    Offline,
    Hold,
}

impl ToolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Online => "online",
            ToolStatus::Offline => "offline",
            ToolStatus::Hold => "hold",
        }
    }
}

impl FromStr for ToolStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(ToolStatus::Online),
            "offline" => Ok(ToolStatus::Offline),
            "hold" => Ok(ToolStatus::Hold),
            other => Err(AppError::Validation(format!("Unknown tool status: {}", other))),
        }
    }
}

/// An AI tool listed in the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: String,
    pub created_at: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub url: String,
    pub logo: String,
    pub featured: bool,
    pub upvotes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ToolStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<String>,
}

impl Tool {
    /// Tools without a status count as online.
    pub fn is_visible(&self) -> bool {
        matches!(self.status, None | Some(ToolStatus::Online))
    }

    /// Lowercased text the free-text search matches against.
    pub fn search_haystack(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.tags.join(" ")).to_lowercase()
    }
}

/// Request body for creating a new tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateToolRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: String,
    pub logo: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub upvotes: Option<i64>,
    /// New tools are held back from the public listing unless a status is given
    #[serde(default)]
    pub status: Option<ToolStatus>,
    #[serde(default)]
    pub pricing: Option<String>,
}

/// Request body for patching an existing tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateToolRequest {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub title: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub description: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub category: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub tags: Patch<Vec<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub url: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub logo: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub featured: Patch<bool>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub upvotes: Patch<i64>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub status: Patch<ToolStatus>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub pricing: Patch<String>,
}

/// Response body of a tool creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCreated {
    pub tool_id: String,
}

/// Response body of an upvote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpvoteResult {
    pub upvotes: i64,
}

/// Response body of the bootstrap seeding call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResult {
    pub seeded: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_round_trip_strings() {
        for status in [ToolStatus::Online, ToolStatus::Offline, ToolStatus::Hold] {
            assert_eq!(status.as_str().parse::<ToolStatus>(), Ok(status));
        }
        let err = "archived".parse::<ToolStatus>().unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_missing_status_is_visible() {
        let tool: Tool = serde_json::from_value(json!({
            "id": "t1",
            "createdAt": "2024-01-01T00:00:00Z",
            "title": "A",
            "description": "",
            "category": "General",
            "tags": [],
            "url": "",
            "logo": "✨",
            "featured": false,
            "upvotes": 0
        }))
        .unwrap();
        assert!(tool.is_visible());

        let mut tool = tool;
        tool.status = Some(ToolStatus::Online);
        assert!(tool.is_visible());
        tool.status = Some(ToolStatus::Hold);
        assert!(!tool.is_visible());
        tool.status = Some(ToolStatus::Offline);
        assert!(!tool.is_visible());
    }

    #[test]
    fn test_update_request_distinguishes_null_pricing() {
        let req: UpdateToolRequest =
            serde_json::from_value(json!({ "pricing": null, "upvotes": 3 })).unwrap();
        assert_eq!(req.pricing, Patch::Null);
        assert_eq!(req.upvotes, Patch::Value(3));
        assert!(req.title.is_absent());
    }
}
