//! Database layer
//!
//! Database abstraction for Folio. It supports:
//! - SQLite (default, for single-binary deployment)
//! - MySQL
//!
//! The driver is selected by configuration. Repositories dispatch on
//! [`DatabasePool::driver`] and run backend-specific SQL.
//!
//! # Usage
//!
//! ```ignore
//! use folio::config::DatabaseConfig;
//! use folio::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
