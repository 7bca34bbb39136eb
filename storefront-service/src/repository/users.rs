//! User storage over Postgres

use sqlx::PgPool;
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryOperation, RepositoryResult};
use super::PageSource;
use crate::listing::{EntityKind, Page, PageRequest, PageStats};
use crate::models::{CreateUser, UpdateUser, UserRow};

const COLUMNS: &str =
    "id, name, email, password, gender, about, image, created_by, updated_by, created_at, updated_at";

/// Repository for the users table
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &CreateUser) -> RepositoryResult<UserRow> {
        let id = Uuid::new_v4().to_string();
        let sql = format!(
            "INSERT INTO users (id, name, email, password, gender, about) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(&id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password)
            .bind(&input.gender)
            .bind(&input.about)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Create))
    }

    pub async fn update(&self, id: &str, input: &UpdateUser) -> RepositoryResult<UserRow> {
        let sql = format!(
            "UPDATE users SET name = $2, email = $3, password = $4, gender = $5, \
             about = $6, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password)
            .bind(&input.gender)
            .bind(&input.about)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Update))?
            .ok_or_else(|| {
                RepositoryError::not_found("user", id).with_operation(RepositoryOperation::Update)
            })
    }

    pub async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Delete))?;

        if result.rows_affected() == 0 {
            return Err(
                RepositoryError::not_found("user", id).with_operation(RepositoryOperation::Delete)
            );
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<UserRow> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)?
            .ok_or_else(|| RepositoryError::not_found("user", id))
    }

    pub async fn find_by_email(&self, email: &str) -> RepositoryResult<UserRow> {
        let sql = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)?
            .ok_or_else(|| RepositoryError::not_found("user", email))
    }

    /// Record the stored image file name for a user
    pub async fn set_image(&self, id: &str, file_name: &str) -> RepositoryResult<UserRow> {
        let sql = format!(
            "UPDATE users SET image = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(file_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Update))?
            .ok_or_else(|| {
                RepositoryError::not_found("user", id).with_operation(RepositoryOperation::Update)
            })
    }
}

impl PageSource for UserRepository {
    type Record = UserRow;

    fn kind(&self) -> EntityKind {
        EntityKind::User
    }

    fn sort_column(&self, field: &str) -> Option<&'static str> {
        sort_column(field)
    }

    async fn fetch_page(
        &self,
        column: &'static str,
        request: &PageRequest,
    ) -> RepositoryResult<Page<UserRow>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Count))?;

        // column is whitelisted, never raw caller input
        let sql = format!(
            "SELECT {COLUMNS} FROM users ORDER BY {column} {dir} LIMIT $1 OFFSET $2",
            dir = request.direction.as_sql(),
        );
        let items = sqlx::query_as::<_, UserRow>(&sql)
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
    ) -> RepositoryResult<Page<UserRow>> {
        let pattern = super::like_pattern(keyword);

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE name LIKE $1 ESCAPE '\\'")
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Count))?;

        let sql = format!(
            "SELECT {COLUMNS} FROM users WHERE name LIKE $1 ESCAPE '\\' \
             ORDER BY {column} {dir} LIMIT $2 OFFSET $3",
            dir = request.direction.as_sql(),
        );
        let items = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&pattern)
            .bind(request.page_size)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::FindPage))?;

        Ok(Page::new(items, PageStats::new(total, request)))
    }
}

/// Sortable column whitelist for users
fn sort_column(field: &str) -> Option<&'static str> {
    match field {
        "id" => Some("id"),
        "name" => Some("name"),
        "email" => Some("email"),
        "gender" => Some("gender"),
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
        assert_eq!(sort_column("name"), Some("name"));
        assert_eq!(sort_column("email"), Some("email"));
        assert_eq!(sort_column("createdAt"), Some("created_at"));
        assert_eq!(sort_column("doesNotExist"), None);
        // no way to smuggle SQL through the sort field
        assert_eq!(sort_column("name; DROP TABLE users"), None);
    }
}
