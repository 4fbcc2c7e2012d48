//! Items

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::money_to_decimal,
    products::{Product, ProductId},
};

/// A single product-and-quantity pair within a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem<'a> {
    product_id: ProductId,
    name: String,
    unit_price: Money<'a, Currency>,
    quantity: u32,
    image_ref: Option<String>,
}

impl<'a> CartLineItem<'a> {
    /// Creates a line item for the given product and quantity.
    pub(crate) fn from_product(product: &Product<'a>, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            image_ref: product.image_ref.clone(),
        }
    }

    /// Refresh the display details from a newer product descriptor.
    pub(crate) fn refresh(&mut self, product: &Product<'a>) {
        self.name.clone_from(&product.name);
        self.unit_price = product.price;
        self.image_ref.clone_from(&product.image_ref);
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// Product identifier
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Number of units
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Image reference, if any
    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    /// Exact `unit_price * quantity`, unrounded.
    pub fn line_total(&self) -> Decimal {
        money_to_decimal(&self.unit_price) * Decimal::from(self.quantity)
    }
}
