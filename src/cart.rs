//! Cart
//!
//! A cart is an explicit value: every mutation takes the cart by value and
//! hands back the updated cart, so callers own persistence and the engine
//! holds no state of its own.

use std::fmt;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    items::CartLineItem,
    products::{Product, ProductId},
};

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// Quantity to add was zero or negative.
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    /// No line item exists for the product.
    #[error("no line item for product {0}")]
    ItemNotFound(ProductId),

    /// The product is priced in a different currency to the cart (product, product currency, cart currency).
    #[error("product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// The product has a negative unit price.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// The resulting quantity does not fit in a line item.
    #[error("quantity for product {0} is too large")]
    QuantityOverflow(ProductId),
}

/// Identity of the user owning a cart, supplied by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Creates an owner identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OwnerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Cart
#[derive(Debug, Clone, PartialEq)]
pub struct Cart<'a> {
    owner: OwnerId,
    currency: &'static Currency,
    items: IndexMap<ProductId, CartLineItem<'a>>,
}

impl<'a> Cart<'a> {
    /// Create an empty cart for the owner, priced in the given currency.
    pub fn new(owner: impl Into<OwnerId>, currency: &'static Currency) -> Self {
        Cart {
            owner: owner.into(),
            currency,
            items: IndexMap::new(),
        }
    }

    /// Add `quantity` units of a product, merging into an existing line item
    /// for the same product id.
    ///
    /// An existing line keeps its position and takes the name, price and
    /// image of the supplied descriptor.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero or negative.
    /// - [`CartError::CurrencyMismatch`]: the product is priced in another currency.
    /// - [`CartError::NegativePrice`]: the product price is below zero.
    /// - [`CartError::QuantityOverflow`]: the merged quantity does not fit.
    pub fn add_or_merge_line_item(
        mut self,
        product: &Product<'a>,
        quantity: i64,
    ) -> Result<Self, CartError> {
        let quantity = positive_quantity(quantity, &product.id)?;

        self.ensure_priceable(product)?;

        if let Some(existing) = self.items.get_mut(&product.id) {
            let merged = existing
                .quantity()
                .checked_add(quantity)
                .ok_or_else(|| CartError::QuantityOverflow(product.id.clone()))?;

            existing.set_quantity(merged);
            existing.refresh(product);

            debug!(product_id = %product.id, added = quantity, quantity = merged, "merged line item");
        } else {
            self.items.insert(
                product.id.clone(),
                CartLineItem::from_product(product, quantity),
            );

            debug!(product_id = %product.id, quantity, "added line item");
        }

        Ok(self)
    }

    /// Replace the quantity of an existing line item; zero or below removes it.
    ///
    /// # Errors
    ///
    /// - [`CartError::ItemNotFound`]: the cart has no line for `product_id`.
    /// - [`CartError::QuantityOverflow`]: `quantity` does not fit in a line item.
    pub fn set_line_item_quantity(
        mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<Self, CartError> {
        if !self.items.contains_key(product_id) {
            return Err(CartError::ItemNotFound(product_id.clone()));
        }

        if quantity <= 0 {
            self.items.shift_remove(product_id);

            debug!(product_id = %product_id, "removed line item by zero quantity");

            return Ok(self);
        }

        let quantity = positive_quantity(quantity, product_id)?;

        if let Some(item) = self.items.get_mut(product_id) {
            item.set_quantity(quantity);
        }

        debug!(product_id = %product_id, quantity, "set line item quantity");

        Ok(self)
    }

    /// Remove the line item for `product_id`; absent ids are ignored.
    #[must_use]
    pub fn remove_line_item(mut self, product_id: &ProductId) -> Self {
        if self.items.shift_remove(product_id).is_some() {
            debug!(product_id = %product_id, "removed line item");
        }

        self
    }

    /// Exact sum of `unit_price * quantity` over all line items.
    pub fn subtotal(&self) -> Decimal {
        self.items.values().map(CartLineItem::line_total).sum()
    }

    /// Line item for a product, if present.
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLineItem<'a>> {
        self.items.get(product_id)
    }

    /// Whether the cart holds a line for the product.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.contains_key(product_id)
    }

    /// Iterate line items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem<'a>> {
        self.items.values()
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all line items.
    pub fn item_count(&self) -> u64 {
        self.items.values().map(|item| u64::from(item.quantity())).sum()
    }

    /// Owner of the cart.
    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn ensure_priceable(&self, product: &Product<'a>) -> Result<(), CartError> {
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                product.id.clone(),
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if product.price.to_minor_units() < 0 {
            return Err(CartError::NegativePrice(product.id.clone()));
        }

        Ok(())
    }
}

fn positive_quantity(quantity: i64, product_id: &ProductId) -> Result<u32, CartError> {
    if quantity <= 0 {
        return Err(CartError::InvalidQuantity(quantity));
    }

    u32::try_from(quantity).map_err(|_err| CartError::QuantityOverflow(product_id.clone()))
}
