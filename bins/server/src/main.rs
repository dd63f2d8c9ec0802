//! Kudi API server.
//!
//! Wires configuration, the database pool, and the credit policy into the
//! axum router and serves it.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kudi_api::{AppState, create_router};
use kudi_core::credit::CreditPolicy;
use kudi_db::connect;
use kudi_shared::AppConfig;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kudi=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load().expect("Failed to load configuration");

    let db = connect(&config.database).await?;
    info!("Connected to database");

    let policy = CreditPolicy::from_config(&config.credit);
    info!(
        min_down_payment_percent = %policy.min_down_payment_percent,
        term_days = policy.term_days,
        interest_rate = %policy.interest_rate,
        penalty_rate = %policy.penalty_rate,
        "Credit policy loaded"
    );

    let state = AppState {
        db: Arc::new(db),
        policy,
    };
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
