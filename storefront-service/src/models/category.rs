//! Category rows and representations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A category row as stored in Postgres
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public representation of a category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cover_image: Option<String>,
}

impl CategoryDto {
    /// Explicit field-by-field copy from the storage row
    pub fn from_row(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            cover_image: row.cover_image,
        }
    }
}

/// Payload for creating a category
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    pub title: String,
    pub description: String,
}

/// Payload for updating a category
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_copies_fields() {
        let row = CategoryRow {
            id: "c1".to_string(),
            title: "Beauty Products".to_string(),
            description: "Creams and such".to_string(),
            cover_image: None,
            created_by: None,
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let dto = CategoryDto::from_row(row);
        assert_eq!(dto.id, "c1");
        assert_eq!(dto.title, "Beauty Products");
        assert!(dto.cover_image.is_none());
    }
}
