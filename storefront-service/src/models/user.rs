//! User rows and representations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user row as stored in Postgres
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub gender: Option<String>,
    pub about: Option<String>,
    pub image: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public representation of a user
///
/// The password column never leaves the service; it has no field here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub gender: Option<String>,
    pub about: Option<String>,
    pub image: Option<String>,
}

impl UserDto {
    /// Explicit field-by-field copy from the storage row
    pub fn from_row(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            gender: row.gender,
            about: row.about,
            image: row.image,
        }
    }
}

/// Payload for creating a user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub gender: Option<String>,
    pub about: Option<String>,
}

/// Payload for updating a user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub gender: Option<String>,
    pub about: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> UserRow {
        UserRow {
            id: "u1".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "hunter2".to_string(),
            gender: Some("female".to_string()),
            about: None,
            image: Some("abc.png".to_string()),
            created_by: None,
            updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_dto_copies_fields() {
        let dto = UserDto::from_row(row());
        assert_eq!(dto.id, "u1");
        assert_eq!(dto.name, "Alice");
        assert_eq!(dto.email, "alice@example.com");
        assert_eq!(dto.image, Some("abc.png".to_string()));
    }

    #[test]
    fn test_password_never_serialized() {
        let dto = UserDto::from_row(row());
        let json = serde_json::to_string(&dto).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hunter2"));
    }
}
