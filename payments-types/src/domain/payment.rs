//! Payment domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::currency::Currency;
use super::customer::CustomerId;
use crate::error::DomainError;

/// Identifier assigned to a payment by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PaymentId(i64);

impl PaymentId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PaymentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A validated payment for a known customer, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub customer_id: CustomerId,
    pub amount: Decimal,
    pub currency: Currency,
    /// Opaque card source token
    pub source: String,
    pub description: Option<String>,
}

impl NewPayment {
    /// Creates a new payment.
    ///
    /// # Validation
    /// - Amount must be positive
    /// - Amount must fit the currency's minor units
    /// - Source token cannot be empty
    pub fn new(
        customer_id: CustomerId,
        amount: Decimal,
        currency: Currency,
        source: String,
        description: Option<String>,
    ) -> Result<Self, DomainError> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::Validation("Amount must be positive".into()));
        }
        if currency.to_minor_units(amount).is_none() {
            return Err(DomainError::Validation(format!(
                "Amount {amount} is not a whole number of {currency} minor units"
            )));
        }
        if source.trim().is_empty() {
            return Err(DomainError::Validation("Card source cannot be empty".into()));
        }

        Ok(Self {
            customer_id,
            amount,
            currency,
            source,
            description,
        })
    }

    /// Attaches the store-assigned id.
    pub fn into_payment(self, id: PaymentId) -> Payment {
        Payment {
            id,
            customer_id: self.customer_id,
            amount: self.amount,
            currency: self.currency,
            source: self.source,
            description: self.description,
        }
    }
}

/// A recorded card payment.
///
/// Payments are immutable once stored and exist only for confirmed debits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: PaymentId,
    pub customer_id: CustomerId,
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
    pub currency: Currency,
    #[schema(example = "x0x0x0x0x0")]
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Food")]
    pub description: Option<String>,
}

/// Outcome of a charge attempt at the card gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPaymentCharge {
    card_debited: bool,
}

impl CardPaymentCharge {
    pub fn new(card_debited: bool) -> Self {
        Self { card_debited }
    }

    pub fn is_card_debited(&self) -> bool {
        self.card_debited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_payment_creation() {
        let customer = CustomerId::new();
        let payment = NewPayment::new(
            customer,
            dec!(100.00),
            Currency::GBP,
            "x0x0x0x0x0".into(),
            Some("Food".into()),
        )
        .unwrap();

        let stored = payment.into_payment(PaymentId::new(7));
        assert_eq!(stored.id.value(), 7);
        assert_eq!(stored.customer_id, customer);
        assert_eq!(stored.amount, dec!(100.00));
        assert_eq!(stored.description.as_deref(), Some("Food"));
    }

    #[test]
    fn test_zero_amount_fails() {
        let result = NewPayment::new(CustomerId::new(), dec!(0), Currency::USD, "card".into(), None);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_negative_amount_fails() {
        let result =
            NewPayment::new(CustomerId::new(), dec!(-5.00), Currency::USD, "card".into(), None);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_sub_minor_unit_amount_fails() {
        let result = NewPayment::new(
            CustomerId::new(),
            dec!(10.001),
            Currency::GBP,
            "x0x0x0x0x0".into(),
            None,
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_empty_source_fails() {
        let result = NewPayment::new(CustomerId::new(), dec!(1.00), Currency::USD, " ".into(), None);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
