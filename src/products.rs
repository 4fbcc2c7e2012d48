//! Products

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Product identifier, unique within a cart's line items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Product descriptor, as supplied by the catalog when adding to a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price
    pub price: Money<'a, Currency>,

    /// Opaque image reference used by the storefront
    pub image_ref: Option<String>,
}

impl<'a> Product<'a> {
    /// Create a product without an image reference.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money<'a, Currency>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image_ref: None,
        }
    }

    /// Attach an image reference.
    #[must_use]
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;

    use super::*;

    #[test]
    fn numeric_ids_compare_as_strings() {
        assert_eq!(ProductId::from(7), ProductId::from("7"));
        assert_eq!(ProductId::from(7).to_string(), "7");
    }

    #[test]
    fn with_image_sets_reference() {
        let product = Product::new(1, "Kale", Money::from_minor(499, USD)).with_image("kale.png");

        assert_eq!(product.image_ref.as_deref(), Some("kale.png"));
        assert_eq!(product.id.as_str(), "1");
    }
}
