//! Persistence layer: `SeaORM` entities, repositories, and migrations.
//!
//! Repositories own the transaction and wallet-row-locking discipline; the
//! entities map the credit-ledger tables, and `migration` holds the schema.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{CreditRepository, RepositoryError, WalletRepository};

use std::time::Duration;

use kudi_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Opens a connection pool sized per the database configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(&config.url);
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    Database::connect(options).await
}
