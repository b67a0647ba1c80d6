//! Shared infrastructure for the Fresho storefront
//!
//! Provides the PostgreSQL pool and migrations runner, the Redis client the
//! storefront keeps its sessions in, and the database error type.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, health_check, init_pool};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabaseConfig::from_env()?;
//! let pool = init_pool(&config).await?;
//! health_check(&pool).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod database;
pub mod error;
