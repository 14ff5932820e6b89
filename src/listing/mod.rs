//! Tool listing: visibility, category, tag and free-text filtering.
//!
//! Pure functions over a slice of tools already ordered newest first. Every
//! call is a full scan; there is no pagination.

use serde::{Deserialize, Serialize};

use crate::models::Tool;

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

/// Query parameters of the tool listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    /// Include non-online tools. Ignored for non-admin viewers.
    #[serde(default)]
    pub include_all: Option<bool>,
}

/// Result of a listing: the filtered tools, the featured pick and the
/// filter chips for the result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolListing {
    pub tools: Vec<Tool>,
    pub featured: Option<Tool>,
    pub facets: Facets,
}

/// Normalised filter derived from a [`ToolQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFilter {
    category: Option<String>,
    search: Option<String>,
    tag: Option<String>,
    include_all: bool,
}

impl ToolFilter {
    /// `is_admin` decides whether `include_all` is honoured.
    pub fn new(query: &ToolQuery, is_admin: bool) -> Self {
        let category = query
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
            .map(str::to_string);
        let search = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());
        let tag = query
            .tag
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Self {
            category,
            search,
            tag,
            include_all: is_admin && query.include_all.unwrap_or(false),
        }
    }

    pub fn matches(&self, tool: &Tool) -> bool {
        if !self.include_all && !tool.is_visible() {
            return false;
        }
        if let Some(category) = &self.category {
            if &tool.category != category {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !tool.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !tool.search_haystack().contains(search.as_str()) {
                return false;
            }
        }
        true
    }

    /// Filter `tools` (newest first) and pick the featured tool.
    pub fn apply(&self, tools: &[Tool]) -> ToolListing {
        let filtered: Vec<Tool> = tools.iter().filter(|t| self.matches(t)).cloned().collect();
        let featured = featured_pick(tools, &filtered);
        ToolListing {
            facets: facets(&filtered),
            tools: filtered,
            featured,
        }
    }
}

/// First visible featured tool across the whole set, else the first filtered
/// tool, else none. The featured slot ignores the category, tag and search
/// filters.
pub fn featured_pick(all: &[Tool], filtered: &[Tool]) -> Option<Tool> {
    all.iter()
        .find(|t| t.is_visible() && t.featured)
        .or_else(|| filtered.first())
        .cloned()
}

/// Filter chips offered next to a listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Facets {
    /// Distinct categories in first-seen order
    pub categories: Vec<String>,
    /// Distinct tags, sorted
    pub tags: Vec<String>,
}

pub fn facets(tools: &[Tool]) -> Facets {
    let mut categories: Vec<String> = Vec::new();
    let mut tags: Vec<String> = Vec::new();
    for tool in tools {
        if !categories.contains(&tool.category) {
            categories.push(tool.category.clone());
        }
        tags.extend(tool.tags.iter().cloned());
    }
    tags.sort();
    tags.dedup();
    Facets { categories, tags }
}
