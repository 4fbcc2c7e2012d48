//! Cart Fixtures

use serde::Deserialize;

/// Cart in YAML
#[derive(Debug, Clone, Deserialize)]
pub struct CartFixture {
    /// Owner identity
    pub owner: String,

    /// Items to add, in order. Repeated products are merged.
    #[serde(default)]
    pub items: Vec<CartItemFixture>,
}

/// A single add-to-cart action
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemFixture {
    /// Product id from the product fixture
    pub product: String,

    /// Quantity to add
    pub quantity: i64,
}
