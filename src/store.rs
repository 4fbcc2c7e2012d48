//! Cart storage
//!
//! Persistence belongs to the external document store. This module only
//! defines the seam the engine is driven through, plus an in-memory store
//! for tests and the command-line driver.

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::cart::{Cart, OwnerId};

/// Errors reported by a cart store.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("cart store unavailable: {0}")]
    Unavailable(String),
}

/// Loads and persists carts by owner.
pub trait CartStore<'a> {
    /// Load the owner's cart, if one exists.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be read.
    fn load(&self, owner: &OwnerId) -> Result<Option<Cart<'a>>, StoreError>;

    /// Persist a cart, replacing any previous version for its owner.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be written.
    fn save(&mut self, cart: Cart<'a>) -> Result<(), StoreError>;

    /// Delete the owner's cart, returning it if one existed.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be written.
    fn remove(&mut self, owner: &OwnerId) -> Result<Option<Cart<'a>>, StoreError>;

    /// Load the owner's cart, or start an empty one. Nothing is persisted
    /// until [`CartStore::save`] is called.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be read.
    fn load_or_create(
        &self,
        owner: &OwnerId,
        currency: &'static Currency,
    ) -> Result<Cart<'a>, StoreError> {
        Ok(self
            .load(owner)?
            .unwrap_or_else(|| Cart::new(owner.clone(), currency)))
    }
}

/// Cart store held in memory.
#[derive(Debug, Default)]
pub struct InMemoryCartStore<'a> {
    carts: FxHashMap<OwnerId, Cart<'a>>,
}

impl InMemoryCartStore<'_> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored carts.
    pub fn len(&self) -> usize {
        self.carts.len()
    }

    /// Whether no carts are stored.
    pub fn is_empty(&self) -> bool {
        self.carts.is_empty()
    }
}

impl<'a> CartStore<'a> for InMemoryCartStore<'a> {
    fn load(&self, owner: &OwnerId) -> Result<Option<Cart<'a>>, StoreError> {
        Ok(self.carts.get(owner).cloned())
    }

    fn save(&mut self, cart: Cart<'a>) -> Result<(), StoreError> {
        debug!(owner = %cart.owner(), lines = cart.len(), "saved cart");

        self.carts.insert(cart.owner().clone(), cart);

        Ok(())
    }

    fn remove(&mut self, owner: &OwnerId) -> Result<Option<Cart<'a>>, StoreError> {
        Ok(self.carts.remove(owner))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::products::Product;

    use super::*;

    #[test]
    fn load_or_create_starts_empty_cart() -> TestResult {
        let store = InMemoryCartStore::new();
        let owner = OwnerId::from("alice");

        let cart = store.load_or_create(&owner, USD)?;

        assert!(cart.is_empty());
        assert_eq!(cart.owner(), &owner);
        assert!(store.is_empty(), "load_or_create must not persist");

        Ok(())
    }

    #[test]
    fn save_then_load_round_trips_mutations() -> TestResult {
        let mut store = InMemoryCartStore::new();
        let owner = OwnerId::from("alice");
        let product = Product::new(7, "Oats", Money::from_minor(350, USD));

        let cart = store
            .load_or_create(&owner, USD)?
            .add_or_merge_line_item(&product, 1)?;
        store.save(cart)?;

        let cart = store
            .load_or_create(&owner, USD)?
            .add_or_merge_line_item(&product, 1)?;
        store.save(cart)?;

        let loaded = store.load(&owner)?;

        assert_eq!(store.len(), 1);
        assert_eq!(
            loaded.and_then(|cart| cart.get(&product.id).map(crate::items::CartLineItem::quantity)),
            Some(2)
        );

        Ok(())
    }

    #[test]
    fn carts_are_scoped_to_owner() -> TestResult {
        let mut store = InMemoryCartStore::new();
        let product = Product::new(1, "Kale", Money::from_minor(499, USD));

        store.save(Cart::new("alice", USD).add_or_merge_line_item(&product, 1)?)?;

        assert_eq!(store.load(&OwnerId::from("bob"))?, None);
        assert!(store.remove(&OwnerId::from("alice"))?.is_some());
        assert!(store.is_empty());

        Ok(())
    }
}
