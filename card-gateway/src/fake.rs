//! In-process card charger.

use std::collections::HashSet;

use async_trait::async_trait;
use payments_types::{CardPaymentCharge, CardPaymentCharger, Currency, GatewayError};
use rust_decimal::Decimal;

/// Debits every card except sources on its decline list. Never fails.
#[derive(Debug, Default, Clone)]
pub struct FakeCardCharger {
    declined: HashSet<String>,
}

impl FakeCardCharger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source token that will be declined.
    pub fn declining(mut self, source: impl Into<String>) -> Self {
        self.declined.insert(source.into());
        self
    }

    pub fn declines(&self, source: &str) -> bool {
        self.declined.contains(source)
    }
}

#[async_trait]
impl CardPaymentCharger for FakeCardCharger {
    async fn charge(
        &self,
        source: &str,
        amount: Decimal,
        currency: Currency,
        _description: Option<&str>,
    ) -> Result<CardPaymentCharge, GatewayError> {
        let debited = !self.declines(source);
        tracing::debug!(%amount, %currency, debited, "Fake card charge");
        Ok(CardPaymentCharge::new(debited))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_debits_by_default() {
        let charger = FakeCardCharger::new();

        let charge = charger
            .charge("x0x0x0x0x0", dec!(10.00), Currency::GBP, None)
            .await
            .unwrap();

        assert!(charge.is_card_debited());
    }

    #[tokio::test]
    async fn test_declines_listed_sources() {
        let charger = FakeCardCharger::new().declining("tok_chargeDeclined");

        let declined = charger
            .charge("tok_chargeDeclined", dec!(10.00), Currency::USD, None)
            .await
            .unwrap();
        let accepted = charger
            .charge("tok_visa", dec!(10.00), Currency::USD, None)
            .await
            .unwrap();

        assert!(!declined.is_card_debited());
        assert!(accepted.is_card_debited());
    }
}
