//! Card gateway port.
//!
//! This trait defines the interface for card charging services.
//! Implementations can be HTTP clients, fakes, etc.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::{CardPaymentCharge, Currency};
use crate::error::GatewayError;

/// Port trait for card charging providers.
#[async_trait::async_trait]
pub trait CardPaymentCharger: Send + Sync + 'static {
    /// Attempts to debit `amount` (major units) from the card behind `source`.
    ///
    /// A declined card is `Ok` with `is_card_debited() == false`; `Err` means
    /// the outcome is unknown.
    async fn charge(
        &self,
        source: &str,
        amount: Decimal,
        currency: Currency,
        description: Option<&str>,
    ) -> Result<CardPaymentCharge, GatewayError>;
}

#[async_trait::async_trait]
impl<T: CardPaymentCharger> CardPaymentCharger for Arc<T> {
    async fn charge(
        &self,
        source: &str,
        amount: Decimal,
        currency: Currency,
        description: Option<&str>,
    ) -> Result<CardPaymentCharge, GatewayError> {
        (**self).charge(source, amount, currency, description).await
    }
}
