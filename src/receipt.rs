//! Receipt

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::Cart,
    pricing::{PricingBreakdown, PricingError, RoundedBreakdown, round_to_money},
    shipping::ShippingMethod,
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// An amount could not be rounded to minor units.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A single rounded line on the receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    /// Product display name
    pub name: String,

    /// Units purchased
    pub quantity: u32,

    /// Unit price
    pub unit_price: Money<'static, Currency>,

    /// Rounded `unit_price * quantity`
    pub line_total: Money<'static, Currency>,
}

/// Presentation of a cart and its breakdown, rounded to minor units.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    lines: Vec<ReceiptLine>,
    totals: RoundedBreakdown,
    shipping_method: ShippingMethod,
    discount_code: Option<String>,
}

impl Receipt {
    /// Build a receipt from a cart and the breakdown computed for it.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if an amount overflows minor units.
    pub fn new(cart: &Cart<'_>, breakdown: &PricingBreakdown) -> Result<Self, ReceiptError> {
        let currency = cart.currency();

        let lines = cart
            .iter()
            .map(|item| {
                Ok(ReceiptLine {
                    name: item.name().to_string(),
                    quantity: item.quantity(),
                    unit_price: Money::from_minor(item.unit_price().to_minor_units(), currency),
                    line_total: round_to_money(item.line_total(), currency)?,
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        Ok(Self {
            lines,
            totals: breakdown.rounded()?,
            shipping_method: breakdown.shipping_method(),
            discount_code: breakdown.discount_code().map(str::to_string),
        })
    }

    /// Rounded line items, in cart order.
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Rounded totals.
    pub fn totals(&self) -> &RoundedBreakdown {
        &self.totals
    }

    /// Writes the receipt as a table followed by the summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Qty", "Unit Price", "Line Total"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name.clone(),
                line.quantity.to_string(),
                format!("{}", line.unit_price),
                format!("{}", line.line_total),
            ]);
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}")?;

        self.write_summary(&mut out)?;

        Ok(())
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let discount_label = match &self.discount_code {
            Some(code) => format!("Discount ({code}):"),
            None => "Discount:".to_string(),
        };

        let discount = if self.totals.discount.to_minor_units() == 0 {
            format!("{}", self.totals.discount)
        } else {
            format!("-{}", self.totals.discount)
        };

        let rows = [
            ("Subtotal:".to_string(), format!("{}", self.totals.subtotal)),
            (discount_label, discount),
            (
                format!("Shipping ({}):", self.shipping_method),
                format!("{}", self.totals.shipping_cost),
            ),
            ("Tax:".to_string(), format!("{}", self.totals.tax)),
            ("Total:".to_string(), format!("{}", self.totals.total)),
        ];

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in rows {
            writeln!(out, " {label:<label_width$}  {value:>value_width$}")?;
        }

        Ok(())
    }

    /// Savings as a fraction of the subtotal, for display.
    pub fn savings_fraction(&self) -> Decimal {
        let subtotal = self.totals.subtotal.to_minor_units();

        if subtotal == 0 {
            return Decimal::ZERO;
        }

        Decimal::from(self.totals.discount.to_minor_units()) / Decimal::from(subtotal)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{config::PricingConfig, pricing::compute_breakdown, products::Product};

    use super::*;

    fn cart<'a>() -> Result<Cart<'a>, crate::cart::CartError> {
        Cart::new("alice", USD)
            .add_or_merge_line_item(&Product::new(1, "Kale", Money::from_minor(499, USD)), 2)?
            .add_or_merge_line_item(&Product::new(2, "Honey", Money::from_minor(899, USD)), 1)
    }

    #[test]
    fn lines_follow_cart_order() -> TestResult {
        let cart = cart()?;
        let breakdown = compute_breakdown(&cart, "standard", "", &PricingConfig::default());

        let receipt = Receipt::new(&cart, &breakdown)?;

        let names: Vec<&str> = receipt.lines().iter().map(|line| line.name.as_str()).collect();

        assert_eq!(names, ["Kale", "Honey"]);
        assert_eq!(
            receipt.lines().first().map(|line| line.line_total),
            Some(Money::from_minor(998, USD))
        );

        Ok(())
    }

    #[test]
    fn write_to_renders_items_and_totals() -> TestResult {
        let cart = cart()?;
        let breakdown = compute_breakdown(&cart, "standard", "Organic10", &PricingConfig::default());
        let receipt = Receipt::new(&cart, &breakdown)?;

        let mut out = Vec::new();
        receipt.write_to(&mut out)?;
        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Kale"), "missing item row: {rendered}");
        assert!(rendered.contains("Honey"), "missing item row: {rendered}");
        assert!(rendered.contains("Discount (organic10):"), "missing discount: {rendered}");
        assert!(rendered.contains("Shipping (standard):"), "missing shipping: {rendered}");
        assert!(rendered.contains("Total:"), "missing total: {rendered}");

        Ok(())
    }

    #[test]
    fn savings_fraction_is_relative_to_subtotal() -> TestResult {
        let cart = Cart::new("alice", USD)
            .add_or_merge_line_item(&Product::new(1, "Kale", Money::from_minor(1000, USD)), 2)?;
        let breakdown = compute_breakdown(&cart, "standard", "organic10", &PricingConfig::default());

        let receipt = Receipt::new(&cart, &breakdown)?;

        assert_eq!(receipt.savings_fraction(), Decimal::new(25, 2));

        Ok(())
    }
}
