//! Cartwright prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, OwnerId},
    checkout::{
        Checkout, CheckoutError, CheckoutPhase, PaymentError, PaymentGateway, PaymentReference,
        PaymentRequest,
    },
    config::{ConfigError, PricingConfig},
    discounts::DiscountTable,
    fixtures::{Fixture, FixtureError},
    items::CartLineItem,
    pricing::{PricingBreakdown, PricingError, RoundedBreakdown, compute_breakdown},
    products::{Product, ProductId},
    receipt::{Receipt, ReceiptError},
    shipping::{ShippingMethod, ShippingRates},
    store::{CartStore, InMemoryCartStore, StoreError},
};
