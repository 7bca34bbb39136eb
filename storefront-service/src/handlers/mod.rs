//! HTTP handlers and routing

pub mod categories;
pub mod health;
pub mod products;
pub mod users;

use axum::extract::Multipart;
use axum::routing::get;
use axum::Router;

use crate::error::{Error, Result};
use crate::state::AppState;

/// Build the full application router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .nest("/api/users", users::routes())
        .nest("/api/categories", categories::routes())
        .nest("/api/products", products::routes())
}

/// Pull the first file field out of a multipart upload
///
/// Returns the client-supplied file name and the raw bytes. An upload
/// with no file field is treated the same as an empty file.
pub(crate) async fn read_image_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(format!("Invalid multipart payload: {e}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::BadRequest(format!("Invalid multipart payload: {e}")))?;
        return Ok((file_name, data.to_vec()));
    }

    Err(Error::BadRequest(
        "Image file should not be empty!".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_builds() {
        let _router: Router<AppState> = router();
    }
}
