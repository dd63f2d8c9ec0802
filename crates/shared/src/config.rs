//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Credit policy configuration.
    #[serde(default)]
    pub credit: CreditConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Credit policy configuration.
///
/// Every knob has the production default baked in; deployments override
/// individual values via `KUDI__CREDIT__*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditConfig {
    /// Minimum down payment as a percentage of the total price.
    #[serde(default = "default_min_down_payment_percent")]
    pub min_down_payment_percent: Decimal,
    /// Repayment term in days for new credit lines.
    #[serde(default = "default_term_days")]
    pub term_days: u32,
    /// Flat interest rate (percent) applied at repayment time.
    #[serde(default = "default_interest_rate")]
    pub interest_rate: Decimal,
    /// Penalty rate (percent) per whole overdue week.
    #[serde(default = "default_penalty_rate")]
    pub penalty_rate: Decimal,
    /// Minimum credit score required for a limit increase.
    #[serde(default = "default_limit_increase_min_score")]
    pub limit_increase_min_score: i32,
}

fn default_min_down_payment_percent() -> Decimal {
    Decimal::new(20, 0)
}

fn default_term_days() -> u32 {
    14
}

fn default_interest_rate() -> Decimal {
    Decimal::new(5, 0)
}

fn default_penalty_rate() -> Decimal {
    Decimal::ONE
}

fn default_limit_increase_min_score() -> i32 {
    700
}

impl Default for CreditConfig {
    fn default() -> Self {
        Self {
            min_down_payment_percent: default_min_down_payment_percent(),
            term_days: default_term_days(),
            interest_rate: default_interest_rate(),
            penalty_rate: default_penalty_rate(),
            limit_increase_min_score: default_limit_increase_min_score(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KUDI").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credit_config_defaults() {
        let credit = CreditConfig::default();
        assert_eq!(credit.min_down_payment_percent, dec!(20));
        assert_eq!(credit.term_days, 14);
        assert_eq!(credit.interest_rate, dec!(5));
        assert_eq!(credit.penalty_rate, dec!(1));
        assert_eq!(credit.limit_increase_min_score, 700);
    }
}
