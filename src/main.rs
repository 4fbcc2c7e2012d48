//! Cartwright checkout driver
//!
//! Loads a cart fixture, applies a shipping method and discount code, prints
//! the receipt and prepares the payment request.

use std::{io, process::ExitCode};

use tracing::{error, info, warn};

use cartwright::prelude::*;

use crate::cli::{CliConfig, CliError};

mod cli;
mod observability;

/// Cartwright entry point
pub fn main() -> ExitCode {
    let config = CliConfig::load();

    if let Err(err) = observability::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for subscriber errors"
        )]
        {
            eprintln!("Failed to initialise logging: {err}");
        }

        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "checkout failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig) -> Result<(), CliError> {
    let pricing = match &config.pricing_config {
        Some(path) => PricingConfig::from_path(path)?,
        None => PricingConfig::default(),
    };

    let mut fixture = Fixture::with_base_path(&config.fixtures_dir);
    fixture
        .load_products(&config.fixture)?
        .load_cart(&config.fixture)?;

    let cart = fixture.cart()?;
    let owner = cart.owner().clone();

    let mut store = InMemoryCartStore::new();
    store.save(cart)?;

    let mut checkout = Checkout::new(store.load_or_create(&owner, fixture.currency()?)?);

    checkout.set_shipping_method(&config.shipping)?;

    if !checkout.apply_discount_code(&config.discount_code, &pricing)?
        && !config.discount_code.trim().is_empty()
    {
        warn!(code = %config.discount_code, "discount code not recognised");
    }

    let breakdown = checkout.breakdown(&pricing);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::new(checkout.cart(), &breakdown)?.write_to(&mut handle)?;

    checkout.advance()?;

    let request = checkout.payment_request(&pricing)?;

    info!(
        owner = %request.owner,
        amount_minor = request.amount_minor,
        currency = request.currency,
        "payment request ready"
    );

    Ok(())
}
