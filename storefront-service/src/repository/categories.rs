//! Category storage over Postgres

use sqlx::PgPool;
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryOperation, RepositoryResult};
use super::PageSource;
use crate::listing::{EntityKind, Page, PageRequest, PageStats};
use crate::models::{CategoryRow, CreateCategory, UpdateCategory};

const COLUMNS: &str =
    "id, title, description, cover_image, created_by, updated_by, created_at, updated_at";

/// Repository for the categories table
#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &CreateCategory) -> RepositoryResult<CategoryRow> {
        let id = Uuid::new_v4().to_string();
        let sql = format!(
            "INSERT INTO categories (id, title, description) \
             VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(&id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Create))
    }

    pub async fn update(&self, id: &str, input: &UpdateCategory) -> RepositoryResult<CategoryRow> {
        let sql = format!(
            "UPDATE categories SET title = $2, description = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Update))?
            .ok_or_else(|| {
                RepositoryError::not_found("category", id)
                    .with_operation(RepositoryOperation::Update)
            })
    }

    pub async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Delete))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("category", id)
                .with_operation(RepositoryOperation::Delete));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<CategoryRow> {
        let sql = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)?
            .ok_or_else(|| RepositoryError::not_found("category", id))
    }

    /// Record the stored cover image file name for a category
    pub async fn set_cover_image(&self, id: &str, file_name: &str) -> RepositoryResult<CategoryRow> {
        let sql = format!(
            "UPDATE categories SET cover_image = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(id)
            .bind(file_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Update))?
            .ok_or_else(|| {
                RepositoryError::not_found("category", id)
                    .with_operation(RepositoryOperation::Update)
            })
    }
}

impl PageSource for CategoryRepository {
    type Record = CategoryRow;

    fn kind(&self) -> EntityKind {
        EntityKind::Category
    }

    fn sort_column(&self, field: &str) -> Option<&'static str> {
        sort_column(field)
    }

    async fn fetch_page(
        &self,
        column: &'static str,
        request: &PageRequest,
    ) -> RepositoryResult<Page<CategoryRow>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Count))?;

        let sql = format!(
            "SELECT {COLUMNS} FROM categories ORDER BY {column} {dir} LIMIT $1 OFFSET $2",
            dir = request.direction.as_sql(),
        );
        let items = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(request.page_size)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::FindPage))?;

        Ok(Page::new(items, PageStats::new(total, request)))
    }

    async fn fetch_page_by_keyword(
        &self,
        keyword: &str,
        column: &'static str,
        request: &PageRequest,
    ) -> RepositoryResult<Page<CategoryRow>> {
        let pattern = super::like_pattern(keyword);

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM categories WHERE title LIKE $1 ESCAPE '\\'")
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Count))?;

        let sql = format!(
            "SELECT {COLUMNS} FROM categories WHERE title LIKE $1 ESCAPE '\\' \
             ORDER BY {column} {dir} LIMIT $2 OFFSET $3",
            dir = request.direction.as_sql(),
        );
        let items = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(&pattern)
            .bind(request.page_size)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::FindPage))?;

        Ok(Page::new(items, PageStats::new(total, request)))
    }
}

/// Sortable column whitelist for categories
fn sort_column(field: &str) -> Option<&'static str> {
    match field {
        "id" => Some("id"),
        "title" => Some("title"),
        "description" => Some("description"),
        "createdAt" | "created_at" => Some("created_at"),
        "updatedAt" | "updated_at" => Some("updated_at"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(sort_column("title"), Some("title"));
        assert_eq!(sort_column("createdAt"), Some("created_at"));
        assert_eq!(sort_column("coverImage"), None);
        assert_eq!(sort_column("doesNotExist"), None);
    }
}
