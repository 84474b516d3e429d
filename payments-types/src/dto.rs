//! Data Transfer Objects (DTOs) for requests.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Currency, CustomerId};

// ─────────────────────────────────────────────────────────────────────────────
// Customer DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to register a customer.
///
/// Sending the same name and phone number twice is harmless.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationRequest {
    /// Client-chosen id; generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CustomerId>,
    #[schema(example = "Tara")]
    pub name: String,
    /// `+44` followed by a 10-digit number
    #[schema(example = "+447000000000")]
    pub phone_number: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to charge a customer's card.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentRequest {
    /// Customer to charge. Required on the HTTP API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    /// Amount in major units
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
    pub currency: Currency,
    /// Card source token
    #[schema(example = "x0x0x0x0x0")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Food")]
    pub description: Option<String>,
}
