use std::sync::Arc;

use storefront_service::config::Config;
use storefront_service::database;
use storefront_service::error::Result;
use storefront_service::handlers;
use storefront_service::observability;
use storefront_service::server::Server;
use storefront_service::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    observability::init_tracing(&config);

    let pool = database::create_pool(&config.database).await?;
    database::run_migrations(&pool).await?;

    let state = AppState::new(Arc::new(config.clone()), pool);
    let app = handlers::router().with_state(state);

    Server::new(config).serve(app).await
}
