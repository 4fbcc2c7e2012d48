//! Checkout
//!
//! The checkout wizard is strictly linear: `Shipping -> Payment ->
//! Confirmation`. Going back just steps the phase; nothing is persisted.
//! Confirmation is only reached through a successful charge and is final.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::{Cart, OwnerId},
    config::PricingConfig,
    pricing::{PricingBreakdown, PricingError, breakdown_for_method},
    shipping::ShippingMethod,
};

/// Errors raised while moving through checkout.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// Cannot leave the shipping step with nothing to buy.
    #[error("cart is empty")]
    EmptyCart,

    /// The operation is not available in the current phase.
    #[error("operation not allowed during the {0} phase")]
    WrongPhase(CheckoutPhase),

    /// Leaving the payment step requires a successful charge.
    #[error("payment has not been confirmed")]
    PaymentRequired,

    /// Checkout has already been confirmed.
    #[error("checkout already confirmed")]
    AlreadyConfirmed,

    /// The payment collaborator rejected the charge.
    #[error("payment failed: {0}")]
    Payment(#[from] PaymentError),

    /// The total could not be expressed in minor units.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Active step of the checkout wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutPhase {
    /// Choosing a shipping method and entering a discount code.
    #[default]
    Shipping,

    /// Reviewing the total and paying.
    Payment,

    /// Order placed.
    Confirmation,
}

impl CheckoutPhase {
    /// Phase after this one, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Shipping => Some(Self::Payment),
            Self::Payment => Some(Self::Confirmation),
            Self::Confirmation => None,
        }
    }

    /// Phase before this one. The first phase is its own predecessor and
    /// confirmation is final.
    #[must_use]
    pub fn previous(self) -> Self {
        match self {
            Self::Shipping | Self::Payment => Self::Shipping,
            Self::Confirmation => Self::Confirmation,
        }
    }
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Shipping => "shipping",
            Self::Payment => "payment",
            Self::Confirmation => "confirmation",
        })
    }
}

/// Amount handed to the payment collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Paying user
    pub owner: OwnerId,

    /// Rounded grand total in minor units
    pub amount_minor: i64,

    /// ISO 4217 currency code
    pub currency: &'static str,
}

/// Reference returned by the payment collaborator for a successful charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReference(pub String);

/// Error reported by the payment collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct PaymentError(pub String);

/// Payment processor seam. The processor re-validates the amount before
/// money moves.
#[cfg_attr(test, mockall::automock)]
pub trait PaymentGateway {
    /// Charge the request.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentError`] if the charge is declined or fails.
    fn charge(&self, request: &PaymentRequest) -> Result<PaymentReference, PaymentError>;
}

/// Checkout session for a single cart.
#[derive(Debug, Clone)]
pub struct Checkout<'a> {
    cart: Cart<'a>,
    phase: CheckoutPhase,
    shipping_method: ShippingMethod,
    discount_code: String,
    payment_reference: Option<PaymentReference>,
}

impl<'a> Checkout<'a> {
    /// Start checkout at the shipping step with standard delivery.
    pub fn new(cart: Cart<'a>) -> Self {
        Self {
            cart,
            phase: CheckoutPhase::Shipping,
            shipping_method: ShippingMethod::Standard,
            discount_code: String::new(),
            payment_reference: None,
        }
    }

    /// Cart being checked out.
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// Active phase.
    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    /// Selected shipping method.
    pub fn shipping_method(&self) -> ShippingMethod {
        self.shipping_method
    }

    /// Discount code as entered.
    pub fn discount_code(&self) -> &str {
        &self.discount_code
    }

    /// Payment reference once confirmed.
    pub fn payment_reference(&self) -> Option<&PaymentReference> {
        self.payment_reference.as_ref()
    }

    /// Select a shipping method from a UI key; unknown keys select standard.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongPhase`] outside the shipping step.
    pub fn set_shipping_method(&mut self, key: &str) -> Result<ShippingMethod, CheckoutError> {
        self.ensure_phase(CheckoutPhase::Shipping)?;

        self.shipping_method = ShippingMethod::from_key_or_default(key);

        Ok(self.shipping_method)
    }

    /// Record a discount code. Unknown codes are kept but apply nothing.
    ///
    /// Returns whether the code matched the allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongPhase`] outside the shipping step.
    pub fn apply_discount_code(
        &mut self,
        code: &str,
        config: &PricingConfig,
    ) -> Result<bool, CheckoutError> {
        self.ensure_phase(CheckoutPhase::Shipping)?;

        self.discount_code = code.to_string();

        Ok(config.discounts().resolve(code).is_some())
    }

    /// Remove any entered discount code.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongPhase`] outside the shipping step.
    pub fn clear_discount_code(&mut self) -> Result<(), CheckoutError> {
        self.ensure_phase(CheckoutPhase::Shipping)?;

        self.discount_code.clear();

        Ok(())
    }

    /// Price the cart with the current selections.
    pub fn breakdown(&self, config: &PricingConfig) -> PricingBreakdown {
        breakdown_for_method(&self.cart, self.shipping_method, &self.discount_code, config)
    }

    /// Move from shipping to payment. Confirmation is reached through
    /// [`Checkout::confirm`] only.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: leaving shipping with an empty cart.
    /// - [`CheckoutError::PaymentRequired`]: at the payment step.
    /// - [`CheckoutError::AlreadyConfirmed`]: already at confirmation.
    pub fn advance(&mut self) -> Result<CheckoutPhase, CheckoutError> {
        match self.phase {
            CheckoutPhase::Shipping if self.cart.is_empty() => Err(CheckoutError::EmptyCart),
            CheckoutPhase::Payment => Err(CheckoutError::PaymentRequired),
            phase => {
                let next = phase.next().ok_or(CheckoutError::AlreadyConfirmed)?;

                self.transition(next);

                Ok(next)
            }
        }
    }

    /// Step back one phase; a no-op at the shipping step and once confirmed.
    pub fn back(&mut self) -> CheckoutPhase {
        let previous = self.phase.previous();

        if previous != self.phase {
            info!(owner = %self.cart.owner(), from = %self.phase, to = %previous, "checkout stepped back");
        }

        self.phase = previous;

        previous
    }

    /// Payment request for the rounded total.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::WrongPhase`]: not at the payment step.
    /// - [`CheckoutError::Pricing`]: the total overflows minor units.
    pub fn payment_request(&self, config: &PricingConfig) -> Result<PaymentRequest, CheckoutError> {
        self.ensure_phase(CheckoutPhase::Payment)?;

        let total = self.breakdown(config).rounded()?.total;

        Ok(PaymentRequest {
            owner: self.cart.owner().clone(),
            amount_minor: total.to_minor_units(),
            currency: self.cart.currency().iso_alpha_code,
        })
    }

    /// Charge the total and move to confirmation. A failed charge leaves the
    /// checkout at the payment step.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if not at the payment step or the charge fails.
    pub fn confirm(
        &mut self,
        gateway: &dyn PaymentGateway,
        config: &PricingConfig,
    ) -> Result<&PaymentReference, CheckoutError> {
        let request = self.payment_request(config)?;

        let reference = gateway.charge(&request).inspect_err(|err| {
            warn!(owner = %request.owner, error = %err, "payment failed");
        })?;

        self.transition(CheckoutPhase::Confirmation);

        Ok(self.payment_reference.insert(reference))
    }

    fn transition(&mut self, next: CheckoutPhase) {
        info!(owner = %self.cart.owner(), from = %self.phase, to = %next, "checkout advanced");

        self.phase = next;
    }

    fn ensure_phase(&self, phase: CheckoutPhase) -> Result<(), CheckoutError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(CheckoutError::WrongPhase(self.phase))
        }
    }
}
