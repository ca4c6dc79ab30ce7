mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod utils;

use std::sync::Arc;

use data::memory::InMemoryStore;
use data::postgres::PostgresStore;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use tracing::warn;
use utils::start_rest_server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;

    match config.database_url.clone() {
        Some(database_url) => {
            let pool = create_pool(&database_url).await?;
            run_migrations(&pool).await?;
            start_rest_server(config, Arc::new(PostgresStore::new(pool))).await
        }
        None => {
            warn!("DATABASE_URL not set, records live in process memory and are lost on exit");
            start_rest_server(config, Arc::new(InMemoryStore::new())).await
        }
    }
}
