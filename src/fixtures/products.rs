//! Product Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, JPY, USD},
};
use serde::Deserialize;

use crate::{fixtures::FixtureError, pricing::minor_units_per_major, products::Product};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product id -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product price (e.g., "4.99 USD")
    pub price: String,

    /// Image reference
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductFixture {
    /// Build the product descriptor for the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the price cannot be parsed.
    pub fn into_product<'a>(self, id: &str) -> Result<Product<'a>, FixtureError> {
        let (minor_units, currency) = parse_price(&self.price)?;

        let product = Product::new(id, self.name, Money::from_minor(minor_units, currency));

        Ok(match self.image {
            Some(image) => product.with_image(image),
            None => product,
        })
    }
}

/// Parse price string (e.g., "4.99 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal with at most as many decimal
/// places as the currency's minor unit, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = match currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        "JPY" => JPY,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() || amount.normalize().scale() > currency.exponent {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    let minor_units = minor_units_per_major(currency)
        .and_then(|scale| amount.checked_mul(scale))
        .and_then(|value| value.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_valid() -> TestResult {
        assert_eq!(parse_price("4.99 USD")?, (499, USD));
        assert_eq!(parse_price("11.25 GBP")?, (1125, GBP));
        assert_eq!(parse_price("3 EUR")?, (300, EUR));
        assert_eq!(parse_price("1000 JPY")?, (1000, JPY));
        assert_eq!(parse_price("4.990 USD")?, (499, USD));

        Ok(())
    }

    #[test]
    fn parse_price_invalid_format() {
        assert!(matches!(parse_price("4.99"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("4.99 USD extra"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("abc USD"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("-1.00 USD"), Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_sub_minor_precision() {
        assert!(matches!(parse_price("4.999 USD"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("12.5 JPY"), Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_unknown_currency() {
        assert!(matches!(parse_price("4.99 XYZ"), Err(FixtureError::UnknownCurrency(code)) if code == "XYZ"));
    }

    #[test]
    fn into_product_keeps_image() -> TestResult {
        let fixture = ProductFixture {
            name: "Kale".to_string(),
            price: "4.99 USD".to_string(),
            image: Some("kale.webp".to_string()),
        };

        let product = fixture.into_product("1")?;

        assert_eq!(product.id.as_str(), "1");
        assert_eq!(product.price, Money::from_minor(499, USD));
        assert_eq!(product.image_ref.as_deref(), Some("kale.webp"));

        Ok(())
    }
}
