//! Pricing configuration
//!
//! Built-in defaults match the storefront constants. A YAML file can override
//! any section:
//!
//! ```yaml
//! tax_rate: "8%"
//! discount_codes:
//!   organic10: "5.00"
//! shipping:
//!   standard: "5.99"
//!   express: "12.99"
//!   same-day: "19.99"
//! ```

use std::{fs, path::Path, str::FromStr};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    discounts::{DiscountTable, default_discounts},
    shipping::{ShippingMethod, ShippingRates},
};

/// Default sales tax rate (8%), as a fraction.
pub fn default_tax_rate() -> Decimal {
    Decimal::new(8, 2)
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid money amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid tax rate
    #[error("Invalid tax rate: {0}")]
    InvalidTaxRate(String),
}

/// Tax rate, discount allow-list and shipping table used to price carts.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    tax_rate: Decimal,
    discounts: DiscountTable,
    shipping: ShippingRates,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            discounts: default_discounts(),
            shipping: ShippingRates::default(),
        }
    }
}

/// Raw YAML shape of a pricing config file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PricingConfigFile {
    tax_rate: Option<String>,
    discount_codes: Option<FxHashMap<String, String>>,
    shipping: Option<FxHashMap<ShippingMethod, String>>,
}

impl PricingConfig {
    /// Tax rate applied to the discounted subtotal.
    pub fn tax_rate(&self) -> Percentage {
        Percentage::from(self.tax_rate)
    }

    /// Discount code allow-list.
    pub fn discounts(&self) -> &DiscountTable {
        &self.discounts
    }

    /// Shipping cost table.
    pub fn shipping(&self) -> &ShippingRates {
        &self.shipping
    }

    /// Replace the tax rate (a fraction, e.g. `0.08`).
    #[must_use]
    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// Replace the discount table.
    #[must_use]
    pub fn with_discounts(mut self, discounts: DiscountTable) -> Self {
        self.discounts = discounts;
        self
    }

    /// Replace the shipping table.
    #[must_use]
    pub fn with_shipping(mut self, shipping: ShippingRates) -> Self {
        self.shipping = shipping;
        self
    }

    /// Load a config file, layering it over the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or any value is malformed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        debug!(path = %path.display(), "loading pricing config");

        Self::from_yaml_str(&contents)
    }

    /// Parse YAML, layering it over the defaults.
    ///
    /// A `discount_codes` section replaces the default codes entirely, while
    /// `shipping` entries override individual methods.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML or any value is malformed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if yaml.trim().is_empty() {
            return Ok(config);
        }

        let file: PricingConfigFile = serde_norway::from_str(yaml)?;

        if let Some(rate) = file.tax_rate.as_deref() {
            config.tax_rate = parse_tax_rate(rate)?;
        }

        if let Some(codes) = file.discount_codes {
            let mut discounts = DiscountTable::empty();

            for (code, amount) in codes {
                discounts.insert(&code, parse_amount(&amount)?);
            }

            config.discounts = discounts;
        }

        if let Some(rates) = file.shipping {
            for (method, cost) in rates {
                config.shipping.insert(method, parse_amount(&cost)?);
            }
        }

        Ok(config)
    }
}

/// Parse a non-negative money amount such as `"5.99"`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidAmount`] for malformed or negative amounts.
pub fn parse_amount(s: &str) -> Result<Decimal, ConfigError> {
    let amount =
        Decimal::from_str(s.trim()).map_err(|_err| ConfigError::InvalidAmount(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(ConfigError::InvalidAmount(s.to_string()));
    }

    Ok(amount)
}

/// Parse a tax rate as a percentage (`"8%"`) or fraction (`"0.08"`).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidTaxRate`] for malformed or negative rates.
pub fn parse_tax_rate(s: &str) -> Result<Decimal, ConfigError> {
    let trimmed = s.trim();

    let rate = if let Some(percent) = trimmed.strip_suffix('%') {
        Decimal::from_str(percent.trim()).map(|value| value / Decimal::ONE_HUNDRED)
    } else {
        Decimal::from_str(trimmed)
    }
    .map_err(|_err| ConfigError::InvalidTaxRate(s.to_string()))?;

    if rate.is_sign_negative() {
        return Err(ConfigError::InvalidTaxRate(s.to_string()));
    }

    Ok(rate)
}
