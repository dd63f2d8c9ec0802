//! Schema migration CLI for the Kudi database.
//!
//! Wraps the sea-orm-migration runner; the usual subcommands apply
//! (`up`, `down`, `status`, `fresh`). Reads `DATABASE_URL` from the
//! environment or a `.env` file.

use kudi_db::migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run_cli(Migrator).await;
}
