//! Image storage on the local filesystem
//!
//! Uploaded images land under one subdirectory per entity kind, renamed
//! to a generated UUID so uploads never collide or overwrite each other.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::listing::EntityKind;

/// Extensions accepted for uploads, matched case-insensitively
const ALLOWED_EXTENSIONS: [&str; 3] = ["jpeg", "jpg", "png"];

/// Filesystem-backed image store
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Persist an uploaded image and return its stored file name
    ///
    /// The original name only contributes its extension; the stored name
    /// is a fresh UUID.
    pub async fn save(&self, kind: EntityKind, original_name: &str, data: &[u8]) -> Result<String> {
        if data.is_empty() {
            return Err(Error::BadRequest(
                "Image file should not be empty!".to_string(),
            ));
        }

        let extension = validate_extension(original_name)?;
        let file_name = format!("{}.{}", Uuid::new_v4(), extension);

        let dir = self.root.join(kind.collection());
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(&file_name);
        tokio::fs::write(&path, data).await?;

        tracing::info!(
            kind = kind.as_str(),
            file = %file_name,
            bytes = data.len(),
            "Image stored"
        );

        Ok(file_name)
    }

    /// Read a stored image back, along with its content type
    pub async fn load(&self, kind: EntityKind, file_name: &str) -> Result<(Vec<u8>, &'static str)> {
        // Stored names are UUID-based; anything with a path separator is
        // not ours.
        if file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
            return Err(Error::NotFound(format!("Image not found: {}", file_name)));
        }

        let path = self.root.join(kind.collection()).join(file_name);
        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(format!("Image not found: {}", file_name)));
            }
            Err(e) => return Err(e.into()),
        };

        Ok((data, content_type_for(&path)))
    }
}

/// Check the extension against the allow list and return it lowercased
fn validate_extension(file_name: &str) -> Result<String> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(ext),
        _ => Err(Error::BadRequest(
            "File extensions other than .jpeg, .jpg, .png are not allowed".to_string(),
        )),
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ImageStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let (_dir, store) = store();
        let name = store
            .save(EntityKind::Product, "photo.PNG", b"fake image bytes")
            .await
            .unwrap();

        assert!(name.ends_with(".png"));

        let (data, content_type) = store.load(EntityKind::Product, &name).await.unwrap();
        assert_eq!(data, b"fake image bytes");
        assert_eq!(content_type, "image/png");
    }

    #[tokio::test]
    async fn test_save_rejects_empty_file() {
        let (_dir, store) = store();
        let err = store
            .save(EntityKind::User, "photo.png", b"")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("should not be empty"));
    }

    #[tokio::test]
    async fn test_save_rejects_disallowed_extension() {
        let (_dir, store) = store();
        let err = store
            .save(EntityKind::Category, "malware.exe", b"data")
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("File extensions other than .jpeg, .jpg, .png are not allowed"));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_not_found() {
        let (_dir, store) = store();
        let err = store
            .load(EntityKind::User, "does-not-exist.png")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_load_rejects_path_traversal() {
        let (_dir, store) = store();
        let err = store
            .load(EntityKind::User, "../../etc/passwd")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_validate_extension_is_case_insensitive() {
        assert_eq!(validate_extension("a.JPEG").unwrap(), "jpeg");
        assert_eq!(validate_extension("a.Jpg").unwrap(), "jpg");
        assert!(validate_extension("a.gif").is_err());
        assert!(validate_extension("no-extension").is_err());
    }
}
