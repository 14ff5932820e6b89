//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity. Every
//! mutation bumps the revision counter, which is also published on a watch
//! channel so live subscriptions can re-run their queries.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tokio::sync::watch;

use crate::errors::AppError;
use crate::models::{
    Category, CreateCategoryRequest, CreateToolRequest, RevisionInfo, Tool, ToolStatus,
    UpdateCategoryRequest, UpdateToolRequest,
};

const TOOL_COLUMNS: &str =
    "id, created_at, title, description, category, tags, url, logo, featured, upvotes, status, pricing";

const CATEGORY_COLUMNS: &str = "id, created_at, name, parent_id, x, y";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
    changes: Arc<watch::Sender<i64>>,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            pool,
            changes: Arc::new(changes),
        }
    }

    /// Receiver that observes every revision bump.
    pub fn changes(&self) -> watch::Receiver<i64> {
        self.changes.subscribe()
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID, publish it and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = now_timestamp();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        let revision = self.get_revision_id().await?;
        self.changes.send_replace(revision);
        tracing::debug!(revision, "Revision bumped");
        Ok(revision)
    }

    // ==================== TOOL OPERATIONS ====================

    /// List all tools, newest first.
    pub async fn list_tools(&self) -> Result<Vec<Tool>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tools ORDER BY created_at DESC, rowid DESC",
            TOOL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| tool_from_row(&row)).collect())
    }

    /// Get a tool by ID.
    pub async fn get_tool(&self, id: &str) -> Result<Option<Tool>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM tools WHERE id = ?", TOOL_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(tool_from_row))
    }

    /// Number of stored tools.
    pub async fn count_tools(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM tools")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    /// Create a new tool. Status defaults to `hold`, upvotes to 0.
    pub async fn create_tool(&self, request: &CreateToolRequest) -> Result<Tool, AppError> {
        let tool = tool_from_request(request);
        insert_tool(&self.pool, &tool).await?;

        self.increment_revision().await?;

        Ok(tool)
    }

    /// Insert the given tools if, and only if, the table is empty.
    ///
    /// Returns how many tools were inserted.
    pub async fn seed_tools(&self, tools: &[CreateToolRequest]) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT COUNT(*) AS n FROM tools")
            .fetch_one(&mut *tx)
            .await?;
        let existing: i64 = row.get("n");
        if existing > 0 {
            return Ok(0);
        }

        for request in tools {
            let tool = tool_from_request(request);
            insert_tool(&mut *tx, &tool).await?;
        }

        tx.commit().await?;

        if !tools.is_empty() {
            self.increment_revision().await?;
        }

        Ok(tools.len())
    }

    /// Apply a partial update to a tool.
    ///
    /// Only the columns present in the request are written, so concurrent
    /// patches of different fields never overwrite each other.
    pub async fn update_tool(&self, id: &str, request: &UpdateToolRequest) -> Result<Tool, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE tools SET id = id");

        if let Some(title) = request.title.required("title")? {
            query.push(", title = ").push_bind(title.clone());
        }
        if let Some(description) = request.description.required("description")? {
            query.push(", description = ").push_bind(description.clone());
        }
        if let Some(category) = request.category.required("category")? {
            query.push(", category = ").push_bind(category.clone());
        }
        if let Some(tags) = request.tags.required("tags")? {
            query.push(", tags = ").push_bind(encode_tags(tags));
        }
        if let Some(url) = request.url.required("url")? {
            query.push(", url = ").push_bind(url.clone());
        }
        if let Some(logo) = request.logo.required("logo")? {
            query.push(", logo = ").push_bind(logo.clone());
        }
        if let Some(featured) = request.featured.required("featured")? {
            query.push(", featured = ").push_bind(*featured as i32);
        }
        if let Some(upvotes) = request.upvotes.required("upvotes")? {
            query.push(", upvotes = ").push_bind(*upvotes);
        }
        if let Some(status) = request.status.as_nullable() {
            query
                .push(", status = ")
                .push_bind(status.map(|s| s.as_str()));
        }
        if let Some(pricing) = request.pricing.as_nullable() {
            query.push(", pricing = ").push_bind(pricing.cloned());
        }

        query.push(" WHERE id = ").push_bind(id.to_string());
        query.push(format!(" RETURNING {}", TOOL_COLUMNS));

        let row = query
            .build()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tool {} not found", id)))?;

        self.increment_revision().await?;

        Ok(tool_from_row(&row))
    }

    /// Delete a tool.
    pub async fn delete_tool(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tools WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Tool {} not found", id)));
        }

        self.increment_revision().await?;
        Ok(())
    }

    /// Add one upvote and return the new count.
    ///
    /// A single UPDATE statement, so concurrent votes never overwrite each other.
    pub async fn upvote_tool(&self, id: &str) -> Result<i64, AppError> {
        let row = sqlx::query("UPDATE tools SET upvotes = upvotes + 1 WHERE id = ? RETURNING upvotes")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tool {} not found", id)))?;

        self.increment_revision().await?;

        Ok(row.get("upvotes"))
    }

    // ==================== CATEGORY OPERATIONS ====================

    /// List all categories in creation order.
    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM categories ORDER BY created_at ASC, rowid ASC",
            CATEGORY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| category_from_row(&row)).collect())
    }

    /// Get a category by ID.
    pub async fn get_category(&self, id: &str) -> Result<Option<Category>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM categories WHERE id = ?",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(category_from_row))
    }

    /// Create a new category. The name is stored trimmed.
    ///
    /// The parent check and the insert are one statement, so a parent deleted
    /// concurrently is never linked to.
    pub async fn create_category(
        &self,
        request: &CreateCategoryRequest,
    ) -> Result<Category, AppError> {
        let category = Category {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now_timestamp(),
            name: request.name.trim().to_string(),
            parent_id: request.parent_id.clone(),
            x: request.x,
            y: request.y,
        };

        let result = sqlx::query(
            r#"
            INSERT INTO categories (id, created_at, name, parent_id, x, y)
            SELECT ?, ?, ?, ?, ?, ?
            WHERE ? IS NULL OR EXISTS (SELECT 1 FROM categories WHERE id = ?)
            "#,
        )
        .bind(&category.id)
        .bind(&category.created_at)
        .bind(&category.name)
        .bind(&category.parent_id)
        .bind(category.x)
        .bind(category.y)
        .bind(&category.parent_id)
        .bind(&category.parent_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                category.parent_id.as_deref().unwrap_or_default()
            )));
        }

        self.increment_revision().await?;

        Ok(category)
    }

    /// Apply a partial update to a category.
    ///
    /// Only the columns present in the request are written. A blank name is
    /// skipped. A new parent must exist when the row is written; no cycle
    /// check is made.
    pub async fn update_category(
        &self,
        id: &str,
        request: &UpdateCategoryRequest,
    ) -> Result<Category, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE categories SET id = id");

        let name = request
            .name
            .as_value()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty());
        if let Some(name) = name {
            query.push(", name = ").push_bind(name.to_string());
        }
        if let Some(parent_id) = request.parent_id.as_nullable() {
            query.push(", parent_id = ").push_bind(parent_id.cloned());
        }
        if let Some(x) = request.x.as_nullable() {
            query.push(", x = ").push_bind(x.copied());
        }
        if let Some(y) = request.y.as_nullable() {
            query.push(", y = ").push_bind(y.copied());
        }

        query.push(" WHERE id = ").push_bind(id.to_string());
        if let Some(parent_id) = request.parent_id.as_value() {
            query
                .push(" AND EXISTS (SELECT 1 FROM categories WHERE id = ")
                .push_bind(parent_id.clone())
                .push(")");
        }
        query.push(format!(" RETURNING {}", CATEGORY_COLUMNS));

        let Some(row) = query.build().fetch_optional(&self.pool).await? else {
            let missing = match (self.get_category(id).await?, request.parent_id.as_value()) {
                (Some(_), Some(parent_id)) => parent_id.as_str(),
                _ => id,
            };
            return Err(AppError::NotFound(format!("Category {} not found", missing)));
        };

        self.increment_revision().await?;

        Ok(category_from_row(&row))
    }

    /// Delete a category that no other category names as its parent.
    ///
    /// The children check and the delete are one statement.
    pub async fn delete_category(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM categories WHERE id = ? AND NOT EXISTS (SELECT 1 FROM categories WHERE parent_id = ?)",
        )
        .bind(id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(match self.get_category(id).await? {
                Some(_) => AppError::HasChildren(
                    "Category has subcategories. Delete subcategories first.".to_string(),
                ),
                None => AppError::NotFound(format!("Category {} not found", id)),
            });
        }

        self.increment_revision().await?;
        Ok(())
    }
}

// Helper functions for row conversion

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn tool_from_request(request: &CreateToolRequest) -> Tool {
    Tool {
        id: uuid::Uuid::new_v4().to_string(),
        created_at: now_timestamp(),
        title: request.title.clone(),
        description: request.description.clone(),
        category: request.category.clone(),
        tags: request.tags.clone(),
        url: request.url.clone(),
        logo: request.logo.clone(),
        featured: request.featured,
        upvotes: request.upvotes.unwrap_or(0),
        status: Some(request.status.unwrap_or(ToolStatus::Hold)),
        pricing: request.pricing.clone(),
    }
}

async fn insert_tool<'e, E>(executor: E, tool: &Tool) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        "INSERT INTO tools (id, created_at, title, description, category, tags, url, logo, featured, upvotes, status, pricing) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&tool.id)
    .bind(&tool.created_at)
    .bind(&tool.title)
    .bind(&tool.description)
    .bind(&tool.category)
    .bind(encode_tags(&tool.tags))
    .bind(&tool.url)
    .bind(&tool.logo)
    .bind(tool.featured as i32)
    .bind(tool.upvotes)
    .bind(tool.status.map(|s| s.as_str()))
    .bind(&tool.pricing)
    .execute(executor)
    .await?;
    Ok(())
}

fn tool_from_row(row: &sqlx::sqlite::SqliteRow) -> Tool {
    let featured: i32 = row.get("featured");
    let tags_str: String = row.get("tags");
    let status_str: Option<String> = row.get("status");
    Tool {
        id: row.get("id"),
        created_at: row.get("created_at"),
        title: row.get("title"),
        description: row.get("description"),
        category: row.get("category"),
        tags: parse_json_array(&tags_str),
        url: row.get("url"),
        logo: row.get("logo"),
        featured: featured != 0,
        upvotes: row.get("upvotes"),
        status: status_str.and_then(|s| s.parse().ok()),
        pricing: row.get("pricing"),
    }
}

fn category_from_row(row: &sqlx::sqlite::SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        created_at: row.get("created_at"),
        name: row.get("name"),
        parent_id: row.get("parent_id"),
        x: row.get("x"),
        y: row.get("y"),
    }
}

fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_database, sample_tools};
    use crate::models::Patch;
    use tempfile::TempDir;

    async fn test_repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .unwrap();
        (Repository::new(pool), temp_dir)
    }

    fn tool_request(title: &str) -> CreateToolRequest {
        CreateToolRequest {
            title: title.to_string(),
            description: String::new(),
            category: "General".to_string(),
            tags: vec![],
            url: String::new(),
            logo: "✨".to_string(),
            featured: false,
            upvotes: None,
            status: None,
            pricing: None,
        }
    }

    fn category_request(name: &str, parent_id: Option<&str>) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
            x: None,
            y: None,
        }
    }

    #[tokio::test]
    async fn test_create_tool_defaults_to_hold() {
        let (repo, _dir) = test_repo().await;
        let tool = repo.create_tool(&tool_request("Quick add")).await.unwrap();
        assert_eq!(tool.status, Some(ToolStatus::Hold));
        assert_eq!(tool.upvotes, 0);

        let stored = repo.get_tool(&tool.id).await.unwrap().unwrap();
        assert_eq!(stored, tool);
    }

    #[tokio::test]
    async fn test_list_tools_newest_first() {
        let (repo, _dir) = test_repo().await;
        repo.create_tool(&tool_request("first")).await.unwrap();
        repo.create_tool(&tool_request("second")).await.unwrap();
        repo.create_tool(&tool_request("third")).await.unwrap();

        let titles: Vec<String> = repo
            .list_tools()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_upvote_is_monotonic() {
        let (repo, _dir) = test_repo().await;
        let mut request = tool_request("Votes");
        request.upvotes = Some(10);
        let tool = repo.create_tool(&request).await.unwrap();

        for expected in 11..=15 {
            assert_eq!(repo.upvote_tool(&tool.id).await.unwrap(), expected);
        }
        assert_eq!(repo.get_tool(&tool.id).await.unwrap().unwrap().upvotes, 15);
    }

    #[tokio::test]
    async fn test_concurrent_upvotes_are_all_counted() {
        let (repo, _dir) = test_repo().await;
        let tool = repo.create_tool(&tool_request("Race")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let repo = repo.clone();
            let id = tool.id.clone();
            handles.push(tokio::spawn(async move { repo.upvote_tool(&id).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(repo.get_tool(&tool.id).await.unwrap().unwrap().upvotes, 20);
    }

    #[tokio::test]
    async fn test_upvote_missing_tool() {
        let (repo, _dir) = test_repo().await;
        let err = repo.upvote_tool("missing").await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_tool_patch_semantics() {
        let (repo, _dir) = test_repo().await;
        let mut request = tool_request("Patch me");
        request.pricing = Some("Paid".to_string());
        let tool = repo.create_tool(&request).await.unwrap();

        let update = UpdateToolRequest {
            title: Patch::Value("Patched".to_string()),
            pricing: Patch::Null,
            status: Patch::Value(ToolStatus::Online),
            ..Default::default()
        };
        let updated = repo.update_tool(&tool.id, &update).await.unwrap();
        assert_eq!(updated.title, "Patched");
        assert_eq!(updated.pricing, None);
        assert_eq!(updated.status, Some(ToolStatus::Online));
        assert_eq!(updated.logo, "✨");

        let null_title = UpdateToolRequest {
            title: Patch::Null,
            ..Default::default()
        };
        let err = repo.update_tool(&tool.id, &null_title).await.unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let (repo, _dir) = test_repo().await;
        assert_eq!(repo.seed_tools(&sample_tools()).await.unwrap(), 6);
        assert_eq!(repo.seed_tools(&sample_tools()).await.unwrap(), 0);
        assert_eq!(repo.count_tools().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_delete_category_with_children_is_blocked() {
        let (repo, _dir) = test_repo().await;
        let parent = repo
            .create_category(&category_request("Parent", None))
            .await
            .unwrap();
        let child = repo
            .create_category(&category_request("Child", Some(&parent.id)))
            .await
            .unwrap();

        let err = repo.delete_category(&parent.id).await.unwrap_err();
        assert_eq!(err.error_code(), "HAS_CHILDREN");

        assert_eq!(repo.get_category(&parent.id).await.unwrap().unwrap(), parent);
        assert_eq!(repo.get_category(&child.id).await.unwrap().unwrap(), child);

        repo.delete_category(&child.id).await.unwrap();
        repo.delete_category(&parent.id).await.unwrap();
        assert!(repo.list_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_category_blank_name_is_ignored() {
        let (repo, _dir) = test_repo().await;
        let category = repo
            .create_category(&category_request("  Writing  ", None))
            .await
            .unwrap();
        assert_eq!(category.name, "Writing");

        let updated = repo
            .update_category(&category.id, &UpdateCategoryRequest::rename("   "))
            .await
            .unwrap();
        assert_eq!(updated.name, "Writing");
        assert_eq!(
            repo.get_category(&category.id).await.unwrap().unwrap().name,
            "Writing"
        );
    }

    #[tokio::test]
    async fn test_update_category_parent_link_and_unlink() {
        let (repo, _dir) = test_repo().await;
        let a = repo.create_category(&category_request("A", None)).await.unwrap();
        let b = repo.create_category(&category_request("B", None)).await.unwrap();

        let linked = repo
            .update_category(&b.id, &UpdateCategoryRequest::set_parent(a.id.clone()))
            .await
            .unwrap();
        assert_eq!(linked.parent_id.as_deref(), Some(a.id.as_str()));

        let moved = repo
            .update_category(&b.id, &UpdateCategoryRequest::move_to(10.5, -3.0))
            .await
            .unwrap();
        assert_eq!(moved.parent_id.as_deref(), Some(a.id.as_str()));
        assert_eq!((moved.x, moved.y), (Some(10.5), Some(-3.0)));

        let unlinked = repo
            .update_category(&b.id, &UpdateCategoryRequest::clear_parent())
            .await
            .unwrap();
        assert!(unlinked.is_root());

        let err = repo
            .update_category(&b.id, &UpdateCategoryRequest::set_parent("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_mutations_publish_revisions() {
        let (repo, _dir) = test_repo().await;
        let mut changes = repo.changes();
        let before = repo.get_revision_id().await.unwrap();

        repo.create_category(&category_request("A", None)).await.unwrap();

        changes.changed().await.unwrap();
        assert_eq!(*changes.borrow(), before + 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_moves_keep_new_parent() {
        let (repo, _dir) = test_repo().await;
        let parent = repo.create_category(&category_request("Parent", None)).await.unwrap();

        for round in 0..30 {
            let child = repo
                .create_category(&category_request(&format!("Child {}", round), None))
                .await
                .unwrap();

            let mut moves = Vec::new();
            for step in 0..8 {
                let repo = repo.clone();
                let id = child.id.clone();
                moves.push(tokio::spawn(async move {
                    let position = UpdateCategoryRequest::move_to(step as f64, step as f64);
                    repo.update_category(&id, &position).await
                }));
            }
            let link = {
                let repo = repo.clone();
                let id = child.id.clone();
                let parent_id = parent.id.clone();
                tokio::spawn(async move {
                    repo.update_category(&id, &UpdateCategoryRequest::set_parent(parent_id))
                        .await
                })
            };

            for handle in moves {
                handle.await.unwrap().unwrap();
            }
            link.await.unwrap().unwrap();

            let stored = repo.get_category(&child.id).await.unwrap().unwrap();
            assert_eq!(stored.parent_id.as_deref(), Some(parent.id.as_str()));
            assert_eq!(stored.name, format!("Child {}", round));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_link_racing_parent_delete_never_dangles() {
        let (repo, _dir) = test_repo().await;

        for _ in 0..30 {
            let parent = repo.create_category(&category_request("Parent", None)).await.unwrap();
            let child = repo.create_category(&category_request("Child", None)).await.unwrap();

            let link = {
                let repo = repo.clone();
                let id = child.id.clone();
                let parent_id = parent.id.clone();
                tokio::spawn(async move {
                    repo.update_category(&id, &UpdateCategoryRequest::set_parent(parent_id))
                        .await
                })
            };
            let delete = {
                let repo = repo.clone();
                let id = parent.id.clone();
                tokio::spawn(async move { repo.delete_category(&id).await })
            };
            let linked = link.await.unwrap();
            let deleted = delete.await.unwrap();

            // Exactly one side wins
            assert!(linked.is_ok() != deleted.is_ok());
            let stored = repo.get_category(&child.id).await.unwrap().unwrap();
            match stored.parent_id {
                Some(parent_id) => {
                    assert!(repo.get_category(&parent_id).await.unwrap().is_some());
                    assert_eq!(deleted.unwrap_err().error_code(), "HAS_CHILDREN");
                }
                None => assert_eq!(linked.unwrap_err().error_code(), "NOT_FOUND"),
            }

            repo.delete_category(&child.id).await.unwrap();
            let _ = repo.delete_category(&parent.id).await;
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_tool_patches_touch_only_their_fields() {
        let (repo, _dir) = test_repo().await;
        let tool = repo.create_tool(&tool_request("Original")).await.unwrap();

        let mut handles = Vec::new();
        for n in 0..8 {
            let repo = repo.clone();
            let id = tool.id.clone();
            handles.push(tokio::spawn(async move {
                let update = UpdateToolRequest {
                    upvotes: Patch::Value(n),
                    ..Default::default()
                };
                repo.update_tool(&id, &update).await
            }));
        }
        let rename = UpdateToolRequest {
            title: Patch::Value("Renamed".to_string()),
            ..Default::default()
        };
        repo.update_tool(&tool.id, &rename).await.unwrap();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = repo.get_tool(&tool.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Renamed");
        assert_eq!(stored.created_at, tool.created_at);
    }

    #[tokio::test]
    async fn test_empty_patch_returns_current_row() {
        let (repo, _dir) = test_repo().await;
        let category = repo.create_category(&category_request("Same", None)).await.unwrap();

        let unchanged = repo
            .update_category(&category.id, &UpdateCategoryRequest::default())
            .await
            .unwrap();
        assert_eq!(unchanged, category);

        let err = repo
            .update_category("missing", &UpdateCategoryRequest::move_to(1.0, 1.0))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }
}
