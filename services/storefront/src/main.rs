use anyhow::Result;
use sqlx::migrate::Migrator;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod error;
mod extract;
mod membership;
mod middleware;
mod models;
mod repositories;
mod routes;
mod session;
mod state;
mod validation;

use common::{
    cache::{RedisConfig, RedisPool},
    database::{self, DatabaseConfig},
};

use crate::{
    config::ServerConfig,
    membership::MembershipService,
    repositories::{AccountRepository, ProductRepository},
    session::SessionManager,
    state::AppState,
};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting storefront service");

    let server_config = ServerConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    database::health_check(&pool).await?;
    info!("Database connection successful");

    database::run_migrations(&pool, &MIGRATOR).await?;

    // Initialize Redis for sessions
    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;

    let account_repository = AccountRepository::new(pool.clone());
    let app_state = AppState {
        db_pool: pool.clone(),
        account_repository: account_repository.clone(),
        product_repository: ProductRepository::new(pool),
        session_manager: SessionManager::new(
            redis_pool,
            server_config.session_ttl_seconds,
            server_config.secure_cookies,
        ),
        membership: MembershipService::new(account_repository),
    };

    let app = routes::create_router(app_state);

    let addr = server_config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        secure_cookies = server_config.secure_cookies,
        "Storefront service listening on {}", addr
    );

    axum::serve(listener, app).await?;

    Ok(())
}
