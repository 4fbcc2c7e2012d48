//! Cartwright
//!
//! Cartwright reconciles shopping-cart line items and prices them for checkout: subtotal,
//! flat discount codes, shipping by method, tax and grand total.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod discounts;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod shipping;
pub mod store;
