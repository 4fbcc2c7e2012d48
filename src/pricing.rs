//! Pricing
//!
//! Amounts are carried as exact decimals in major units. Rounding to the
//! currency's minor units only happens in [`PricingBreakdown::rounded`].

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::trace;

use crate::{cart::Cart, config::PricingConfig, shipping::ShippingMethod};

/// Errors that can occur while presenting prices.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Amount cannot be represented in minor units.
    #[error("amount {0} cannot be represented in minor units")]
    MinorUnitOverflow(Decimal),
}

/// Converts money held in minor units into an exact decimal amount, using
/// the currency's own number of decimal places.
pub fn money_to_decimal(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), money.currency().exponent)
}

/// Number of minor units in one major unit of `currency`.
pub(crate) fn minor_units_per_major(currency: &Currency) -> Option<Decimal> {
    10_i64.checked_pow(currency.exponent).map(Decimal::from)
}

/// Round an exact amount half away from zero to the currency's minor unit
/// and express it as money.
///
/// # Errors
///
/// Returns [`PricingError::MinorUnitOverflow`] if the rounded amount does not fit in `i64` minor units.
pub fn round_to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    let rounded =
        amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero);

    let minor = minor_units_per_major(currency)
        .and_then(|scale| rounded.checked_mul(scale))
        .and_then(|value| value.to_i64())
        .ok_or(PricingError::MinorUnitOverflow(amount))?;

    Ok(Money::from_minor(minor, currency))
}

/// Derived prices for a cart at a point in time. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingBreakdown {
    subtotal: Decimal,
    discount: Decimal,
    shipping_cost: Decimal,
    tax: Decimal,
    total: Decimal,
    shipping_method: ShippingMethod,
    discount_code: Option<String>,
    currency: &'static Currency,
}

impl PricingBreakdown {
    /// Sum of line totals.
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Flat discount applied, never more than the subtotal.
    pub fn discount(&self) -> Decimal {
        self.discount
    }

    /// Shipping cost for the resolved method.
    pub fn shipping_cost(&self) -> Decimal {
        self.shipping_cost
    }

    /// Tax on the discounted subtotal, unrounded.
    pub fn tax(&self) -> Decimal {
        self.tax
    }

    /// Grand total, unrounded.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Shipping method the cost was resolved for.
    pub fn shipping_method(&self) -> ShippingMethod {
        self.shipping_method
    }

    /// Normalised discount code, if one matched.
    pub fn discount_code(&self) -> Option<&str> {
        self.discount_code.as_deref()
    }

    /// Currency all amounts are expressed in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Round every amount to minor units for display or payment.
    ///
    /// Each value is rounded independently from its exact amount, so the
    /// rounded parts may not sum to the rounded total.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if any amount overflows minor units.
    pub fn rounded(&self) -> Result<RoundedBreakdown, PricingError> {
        Ok(RoundedBreakdown {
            subtotal: round_to_money(self.subtotal, self.currency)?,
            discount: round_to_money(self.discount, self.currency)?,
            shipping_cost: round_to_money(self.shipping_cost, self.currency)?,
            tax: round_to_money(self.tax, self.currency)?,
            total: round_to_money(self.total, self.currency)?,
        })
    }
}

/// A [`PricingBreakdown`] rounded to minor units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedBreakdown {
    /// Sum of line totals
    pub subtotal: Money<'static, Currency>,

    /// Flat discount
    pub discount: Money<'static, Currency>,

    /// Shipping cost
    pub shipping_cost: Money<'static, Currency>,

    /// Tax
    pub tax: Money<'static, Currency>,

    /// Grand total
    pub total: Money<'static, Currency>,
}

/// Price a cart for a UI-supplied shipping method key and discount code.
///
/// Unrecognised shipping keys fall back to standard delivery and unknown or
/// empty discount codes apply no discount, so this never fails.
pub fn compute_breakdown(
    cart: &Cart<'_>,
    shipping_method: &str,
    discount_code: &str,
    config: &PricingConfig,
) -> PricingBreakdown {
    breakdown_for_method(
        cart,
        ShippingMethod::from_key_or_default(shipping_method),
        discount_code,
        config,
    )
}

/// Price a cart for an already-resolved shipping method.
pub fn breakdown_for_method(
    cart: &Cart<'_>,
    shipping_method: ShippingMethod,
    discount_code: &str,
    config: &PricingConfig,
) -> PricingBreakdown {
    let subtotal = cart.subtotal();

    let (discount_code, discount) = match config.discounts().resolve(discount_code) {
        Some((code, amount)) => (Some(code), amount.min(subtotal).max(Decimal::ZERO)),
        None => (None, Decimal::ZERO),
    };

    let shipping_cost = config.shipping().cost(shipping_method);
    let tax = config.tax_rate() * (subtotal - discount);
    let total = subtotal + shipping_cost + tax - discount;

    trace!(
        owner = %cart.owner(),
        %subtotal,
        %discount,
        %shipping_cost,
        %tax,
        %total,
        shipping_method = %shipping_method,
        "computed breakdown"
    );

    PricingBreakdown {
        subtotal,
        discount,
        shipping_cost,
        tax,
        total,
        shipping_method,
        discount_code,
        currency: cart.currency(),
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{BHD, JPY, USD};
    use testresult::TestResult;

    use crate::{discounts::DiscountTable, products::Product};

    use super::*;

    fn scenario_cart<'a>() -> Result<Cart<'a>, crate::cart::CartError> {
        Cart::new("alice", USD)
            .add_or_merge_line_item(&Product::new(1, "Kale", Money::from_minor(499, USD)), 2)?
            .add_or_merge_line_item(&Product::new(2, "Honey", Money::from_minor(899, USD)), 1)
    }

    #[test]
    fn organic10_standard_scenario() -> TestResult {
        let cart = scenario_cart()?;

        let breakdown = compute_breakdown(&cart, "standard", "organic10", &PricingConfig::default());

        assert_eq!(breakdown.subtotal(), Decimal::new(1897, 2));
        assert_eq!(breakdown.discount(), Decimal::new(500, 2));
        assert_eq!(breakdown.shipping_cost(), Decimal::new(599, 2));
        assert_eq!(breakdown.tax(), Decimal::new(11176, 4));
        assert_eq!(breakdown.total(), Decimal::new(210_776, 4));
        assert_eq!(breakdown.discount_code(), Some("organic10"));

        let rounded = breakdown.rounded()?;

        assert_eq!(rounded.tax, Money::from_minor(112, USD));
        assert_eq!(rounded.total, Money::from_minor(2108, USD));

        Ok(())
    }

    #[test]
    fn unknown_code_and_method_degrade_to_defaults() -> TestResult {
        let cart = scenario_cart()?;

        let breakdown = compute_breakdown(&cart, "hovercraft", "free-stuff", &PricingConfig::default());

        assert_eq!(breakdown.discount(), Decimal::ZERO);
        assert_eq!(breakdown.discount_code(), None);
        assert_eq!(breakdown.shipping_method(), ShippingMethod::Standard);
        assert_eq!(breakdown.shipping_cost(), Decimal::new(599, 2));

        Ok(())
    }

    #[test]
    fn discount_is_clamped_to_subtotal() -> TestResult {
        let cart = Cart::new("alice", USD)
            .add_or_merge_line_item(&Product::new(1, "Mint", Money::from_minor(150, USD)), 1)?;

        let breakdown = compute_breakdown(&cart, "express", "ORGANIC10", &PricingConfig::default());

        assert_eq!(breakdown.discount(), Decimal::new(150, 2));
        assert_eq!(breakdown.tax(), Decimal::ZERO);
        assert_eq!(breakdown.total(), breakdown.shipping_cost());

        Ok(())
    }

    #[test]
    fn empty_cart_costs_only_shipping() {
        let cart = Cart::new("alice", USD);

        let breakdown = compute_breakdown(&cart, "same-day", "organic10", &PricingConfig::default());

        assert_eq!(breakdown.subtotal(), Decimal::ZERO);
        assert_eq!(breakdown.discount(), Decimal::ZERO);
        assert_eq!(breakdown.total(), Decimal::new(1999, 2));
    }

    #[test]
    fn custom_config_is_respected() -> TestResult {
        let cart = scenario_cart()?;
        let config = PricingConfig::default()
            .with_tax_rate(Decimal::new(20, 2))
            .with_discounts(DiscountTable::empty().with_code("half", Decimal::new(897, 2)));

        let breakdown = compute_breakdown(&cart, "standard", "HALF", &config);

        assert_eq!(breakdown.discount(), Decimal::new(897, 2));
        assert_eq!(breakdown.tax(), Decimal::new(2, 0));

        Ok(())
    }

    #[test]
    fn round_to_money_rounds_half_away_from_zero() -> TestResult {
        assert_eq!(round_to_money(Decimal::new(1125, 3), USD)?, Money::from_minor(113, USD));
        assert_eq!(round_to_money(Decimal::new(1124, 3), USD)?, Money::from_minor(112, USD));

        Ok(())
    }

    #[test]
    fn zero_decimal_currency_is_priced_in_whole_units() -> TestResult {
        let cart = Cart::new("kenji", JPY)
            .add_or_merge_line_item(&Product::new(1, "Matcha", Money::from_minor(1000, JPY)), 1)?;

        let breakdown = compute_breakdown(&cart, "standard", "organic10", &PricingConfig::default());

        assert_eq!(cart.subtotal(), Decimal::from(1000));
        assert_eq!(breakdown.discount(), Decimal::from(5));
        assert_eq!(breakdown.tax(), Decimal::new(796, 1));
        assert_eq!(breakdown.total(), Decimal::new(108_059, 2));
        assert_eq!(breakdown.rounded()?.total, Money::from_minor(1081, JPY));

        Ok(())
    }

    #[test]
    fn three_decimal_currency_keeps_fils() -> TestResult {
        let price = Money::from_minor(1250, BHD);

        assert_eq!(money_to_decimal(&price), Decimal::new(1250, 3));
        assert_eq!(round_to_money(Decimal::new(12_505, 4), BHD)?, Money::from_minor(1251, BHD));

        Ok(())
    }

    #[test]
    fn round_to_money_overflow_returns_error() {
        let result = round_to_money(Decimal::MAX, USD);

        assert_eq!(result, Err(PricingError::MinorUnitOverflow(Decimal::MAX)));
    }
}
