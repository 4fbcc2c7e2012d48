//! Command-line configuration

use std::path::PathBuf;

use clap::{Args, Parser};
use thiserror::Error;

use cartwright::prelude::{CheckoutError, ConfigError, FixtureError, ReceiptError, StoreError};

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Cartwright checkout configuration
#[derive(Debug, Parser)]
#[command(name = "cartwright", about = "Price a cart fixture for checkout", long_about = None)]
pub struct CliConfig {
    /// Fixture set to load (products and cart with the same name)
    #[arg(short, long, env = "CARTWRIGHT_FIXTURE", default_value = "organic")]
    pub fixture: String,

    /// Directory holding `products/` and `carts/` fixtures
    #[arg(long, env = "CARTWRIGHT_FIXTURES_DIR", default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// Shipping method (standard, express, same-day)
    #[arg(short, long, env = "CARTWRIGHT_SHIPPING", default_value = "standard")]
    pub shipping: String,

    /// Discount code to apply
    #[arg(short, long, env = "CARTWRIGHT_DISCOUNT_CODE", default_value = "")]
    pub discount_code: String,

    /// Pricing config YAML layered over the built-in defaults
    #[arg(short = 'c', long, env = "CARTWRIGHT_PRICING_CONFIG")]
    pub pricing_config: Option<PathBuf>,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    pub fn load() -> Self {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::parse()
    }
}

/// Errors surfaced by the command-line driver.
#[derive(Debug, Error)]
pub enum CliError {
    /// Pricing config could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Fixture could not be loaded.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// Cart store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Checkout rejected an action.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Receipt could not be written.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        CliConfig::command().debug_assert();
    }

    #[test]
    fn parses_checkout_flags() -> TestResult {
        let config = CliConfig::try_parse_from([
            "cartwright",
            "-f",
            "pantry",
            "-s",
            "express",
            "-d",
            "ORGANIC10",
            "--log-format",
            "json",
        ])?;

        assert_eq!(config.fixture, "pantry");
        assert_eq!(config.shipping, "express");
        assert_eq!(config.discount_code, "ORGANIC10");
        assert!(matches!(config.logging.log_format, LogFormat::Json));
        assert!(config.pricing_config.is_none());

        Ok(())
    }
}
