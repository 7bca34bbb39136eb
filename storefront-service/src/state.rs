//! Shared application state

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::files::ImageStore;
use crate::repository::{CategoryRepository, ProductRepository, UserRepository};

/// State handed to every handler
///
/// Repositories are cheap handles over the shared pool, constructed on
/// demand.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: PgPool,
}

impl AppState {
    pub fn new(config: Arc<Config>, db: PgPool) -> Self {
        Self { config, db }
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.db.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.db.clone())
    }

    pub fn images(&self) -> ImageStore {
        ImageStore::new(self.config.storage.image_dir.clone())
    }
}
