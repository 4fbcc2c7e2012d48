//! Shipping

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// A shipping method key that matched no known method.
#[derive(Debug, Error, PartialEq)]
#[error("unknown shipping method: {0}")]
pub struct UnknownShippingMethod(pub String);

/// Shipping method selected at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShippingMethod {
    /// Standard delivery
    #[default]
    Standard,

    /// Express delivery
    Express,

    /// Delivered the same day
    SameDay,
}

impl ShippingMethod {
    /// All methods, in display order.
    pub const ALL: [ShippingMethod; 3] = [Self::Standard, Self::Express, Self::SameDay];

    /// Canonical key for the method.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::SameDay => "same-day",
        }
    }

    /// Parse a UI-supplied key, falling back to [`ShippingMethod::Standard`]
    /// for anything unrecognised.
    pub fn from_key_or_default(key: &str) -> Self {
        key.parse::<Self>().unwrap_or_else(|err: UnknownShippingMethod| {
            warn!(key = %err.0, "unrecognised shipping method, using standard");
            Self::default()
        })
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingMethod {
    type Err = UnknownShippingMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            "same-day" | "sameday" => Ok(Self::SameDay),
            _ => Err(UnknownShippingMethod(s.to_string())),
        }
    }
}

/// Flat shipping cost per method.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingRates {
    rates: FxHashMap<ShippingMethod, Decimal>,
}

impl ShippingRates {
    /// Set the cost for a method.
    #[must_use]
    pub fn with_rate(mut self, method: ShippingMethod, cost: Decimal) -> Self {
        self.rates.insert(method, cost);
        self
    }

    /// Set the cost for a method.
    pub fn insert(&mut self, method: ShippingMethod, cost: Decimal) {
        self.rates.insert(method, cost);
    }

    /// Cost of a method. Methods missing from the table cost the same as
    /// standard delivery, or nothing if standard is missing too.
    pub fn cost(&self, method: ShippingMethod) -> Decimal {
        self.rates
            .get(&method)
            .or_else(|| self.rates.get(&ShippingMethod::Standard))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for ShippingRates {
    fn default() -> Self {
        let rates = FxHashMap::from_iter([
            (ShippingMethod::Standard, Decimal::new(599, 2)),
            (ShippingMethod::Express, Decimal::new(1299, 2)),
            (ShippingMethod::SameDay, Decimal::new(1999, 2)),
        ]);

        Self { rates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys() {
        assert_eq!("standard".parse::<ShippingMethod>(), Ok(ShippingMethod::Standard));
        assert_eq!("Express".parse::<ShippingMethod>(), Ok(ShippingMethod::Express));
        assert_eq!("same-day".parse::<ShippingMethod>(), Ok(ShippingMethod::SameDay));
        assert_eq!("same_day".parse::<ShippingMethod>(), Ok(ShippingMethod::SameDay));
    }

    #[test]
    fn unknown_key_falls_back_to_standard() {
        assert_eq!(
            ShippingMethod::from_key_or_default("teleport"),
            ShippingMethod::Standard
        );
        assert_eq!(ShippingMethod::from_key_or_default(""), ShippingMethod::Standard);
    }

    #[test]
    fn default_rates() {
        let rates = ShippingRates::default();

        assert_eq!(rates.cost(ShippingMethod::Standard), Decimal::new(599, 2));
        assert_eq!(rates.cost(ShippingMethod::Express), Decimal::new(1299, 2));
        assert_eq!(rates.cost(ShippingMethod::SameDay), Decimal::new(1999, 2));
    }

    #[test]
    fn missing_rate_uses_standard() {
        let rates = ShippingRates {
            rates: FxHashMap::from_iter([(ShippingMethod::Standard, Decimal::new(400, 2))]),
        };

        assert_eq!(rates.cost(ShippingMethod::SameDay), Decimal::new(400, 2));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for method in ShippingMethod::ALL {
            assert_eq!(method.to_string().parse::<ShippingMethod>(), Ok(method));
        }
    }
}
