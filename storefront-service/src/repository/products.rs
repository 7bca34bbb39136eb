//! Product storage over Postgres
//!
//! Beyond the shared listing contract, products page by category and by
//! live flag; both variants reuse the same count-plus-select shape so the
//! page statistics always come from the storage side.

use sqlx::PgPool;
use uuid::Uuid;

use super::error::{RepositoryError, RepositoryOperation, RepositoryResult};
use super::PageSource;
use crate::listing::{EntityKind, Page, PageRequest, PageStats};
use crate::models::{CreateProduct, ProductRow, UpdateProduct};

const COLUMNS: &str = "id, title, description, image, price, discount, quantity, live, stock, \
                       category_id, created_by, updated_by, created_at, updated_at";

/// Repository for the products table
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a product, optionally already attached to a category
    pub async fn create(
        &self,
        input: &CreateProduct,
        category_id: Option<&str>,
    ) -> RepositoryResult<ProductRow> {
        let id = Uuid::new_v4().to_string();
        let sql = format!(
            "INSERT INTO products (id, title, description, price, discount, quantity, live, stock, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.discount)
            .bind(input.quantity)
            .bind(input.live)
            .bind(input.stock)
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Create))
    }

    pub async fn update(&self, id: &str, input: &UpdateProduct) -> RepositoryResult<ProductRow> {
        let sql = format!(
            "UPDATE products SET title = $2, description = $3, price = $4, discount = $5, \
             quantity = $6, live = $7, stock = $8, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.discount)
            .bind(input.quantity)
            .bind(input.live)
            .bind(input.stock)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Update))?
            .ok_or_else(|| {
                RepositoryError::not_found("product", id)
                    .with_operation(RepositoryOperation::Update)
            })
    }

    pub async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Delete))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("product", id)
                .with_operation(RepositoryOperation::Delete));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> RepositoryResult<ProductRow> {
        let sql = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)?
            .ok_or_else(|| RepositoryError::not_found("product", id))
    }

    /// Attach a product to a category
    pub async fn assign_category(
        &self,
        id: &str,
        category_id: &str,
    ) -> RepositoryResult<ProductRow> {
        let sql = format!(
            "UPDATE products SET category_id = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Update))?
            .ok_or_else(|| {
                RepositoryError::not_found("product", id)
                    .with_operation(RepositoryOperation::Update)
            })
    }

    /// Record the stored image file name for a product
    pub async fn set_image(&self, id: &str, file_name: &str) -> RepositoryResult<ProductRow> {
        let sql = format!(
            "UPDATE products SET image = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .bind(file_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Update))?
            .ok_or_else(|| {
                RepositoryError::not_found("product", id)
                    .with_operation(RepositoryOperation::Update)
            })
    }

    /// One page of the products belonging to a category
    pub async fn find_page_by_category(
        &self,
        category_id: &str,
        column: &'static str,
        request: &PageRequest,
    ) -> RepositoryResult<Page<ProductRow>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = $1")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Count))?;

        let sql = format!(
            "SELECT {COLUMNS} FROM products WHERE category_id = $1 \
             ORDER BY {column} {dir} LIMIT $2 OFFSET $3",
            dir = request.direction.as_sql(),
        );
        let items = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(category_id)
            .bind(request.page_size)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::FindPage))?;

        Ok(Page::new(items, PageStats::new(total, request)))
    }

    /// One page of the products currently marked live
    pub async fn find_live_page(
        &self,
        column: &'static str,
        request: &PageRequest,
    ) -> RepositoryResult<Page<ProductRow>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE live = TRUE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Count))?;

        let sql = format!(
            "SELECT {COLUMNS} FROM products WHERE live = TRUE \
             ORDER BY {column} {dir} LIMIT $1 OFFSET $2",
            dir = request.direction.as_sql(),
        );
        let items = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(request.page_size)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::FindPage))?;

        Ok(Page::new(items, PageStats::new(total, request)))
    }
}

impl PageSource for ProductRepository {
    type Record = ProductRow;

    fn kind(&self) -> EntityKind {
        EntityKind::Product
    }

    fn sort_column(&self, field: &str) -> Option<&'static str> {
        sort_column(field)
    }

    async fn fetch_page(
        &self,
        column: &'static str,
        request: &PageRequest,
    ) -> RepositoryResult<Page<ProductRow>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Count))?;

        let sql = format!(
            "SELECT {COLUMNS} FROM products ORDER BY {column} {dir} LIMIT $1 OFFSET $2",
            dir = request.direction.as_sql(),
        );
        let items = sqlx::query_as::<_, ProductRow>(&sql)
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
    ) -> RepositoryResult<Page<ProductRow>> {
        let pattern = super::like_pattern(keyword);

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE title LIKE $1 ESCAPE '\\'")
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::Count))?;

        let sql = format!(
            "SELECT {COLUMNS} FROM products WHERE title LIKE $1 ESCAPE '\\' \
             ORDER BY {column} {dir} LIMIT $2 OFFSET $3",
            dir = request.direction.as_sql(),
        );
        let items = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&pattern)
            .bind(request.page_size)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(RepositoryOperation::FindPage))?;

        Ok(Page::new(items, PageStats::new(total, request)))
    }
}

/// Sortable column whitelist for products
fn sort_column(field: &str) -> Option<&'static str> {
    match field {
        "id" => Some("id"),
        "title" => Some("title"),
        "price" => Some("price"),
        "discount" => Some("discount"),
        "quantity" => Some("quantity"),
        "live" => Some("live"),
        "stock" => Some("stock"),
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
        assert_eq!(sort_column("price"), Some("price"));
        assert_eq!(sort_column("updatedAt"), Some("updated_at"));
        assert_eq!(sort_column("doesNotExist"), None);
        assert_eq!(sort_column("price DESC; --"), None);
    }
}
