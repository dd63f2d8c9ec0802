//! Credit-score recompute job.
//!
//! Walks every wallet and applies the periodic score policy. Run on a
//! recurring cadence (e.g. weekly) by the deployment's job scheduler.
//!
//! Usage: cargo run --bin scorer

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kudi_db::{WalletRepository, connect};
use kudi_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kudi=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().expect("Failed to load configuration");
    let db = connect(&config.database).await?;

    let repo = WalletRepository::new(db);
    let changes = repo.recompute_all_scores().await?;

    for change in &changes {
        info!(
            user_id = %change.user_id,
            old_score = change.old_score,
            new_score = change.new_score,
            "credit score updated"
        );
    }
    info!(wallets = changes.len(), "credit score recompute complete");

    Ok(())
}
