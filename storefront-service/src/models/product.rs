//! Product rows and representations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product row as stored in Postgres
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: f64,
    pub discount: i32,
    pub quantity: i32,
    pub live: bool,
    pub stock: bool,
    pub category_id: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public representation of a product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: f64,
    pub discount: i32,
    pub quantity: i32,
    pub live: bool,
    pub stock: bool,
    pub category_id: Option<String>,
}

impl ProductDto {
    /// Explicit field-by-field copy from the storage row
    pub fn from_row(row: ProductRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            image: row.image,
            price: row.price,
            discount: row.discount,
            quantity: row.quantity,
            live: row.live,
            stock: row.stock,
            category_id: row.category_id,
        }
    }
}

/// Payload for creating a product
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub discount: i32,
    pub quantity: i32,
    #[serde(default)]
    pub live: bool,
    #[serde(default = "default_stock")]
    pub stock: bool,
}

/// Payload for updating a product
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub discount: i32,
    pub quantity: i32,
    #[serde(default)]
    pub live: bool,
    #[serde(default = "default_stock")]
    pub stock: bool,
}

fn default_stock() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_copies_fields() {
        let row = ProductRow {
            id: "p1".to_string(),
            title: "Widget".to_string(),
            description: Some("A widget".to_string()),
            image: None,
            price: 19.99,
            discount: 5,
            quantity: 100,
            live: true,
            stock: true,
            category_id: Some("c1".to_string()),
            created_by: None,
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let dto = ProductDto::from_row(row);
        assert_eq!(dto.id, "p1");
        assert_eq!(dto.price, 19.99);
        assert_eq!(dto.category_id, Some("c1".to_string()));
        assert!(dto.live);
    }

    #[test]
    fn test_create_payload_defaults() {
        let payload: CreateProduct = serde_json::from_str(
            r#"{"title": "Widget", "price": 9.5, "quantity": 3}"#,
        )
        .unwrap();
        assert_eq!(payload.discount, 0);
        assert!(!payload.live);
        assert!(payload.stock);
    }
}
