//! Currencies understood by the payment system.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Currencies the API accepts on the wire.
///
/// Only a subset of these can actually be charged, see [`ACCEPTED_CURRENCIES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    INR,
}

/// Currencies a card may be charged in. Closed set, not configurable at runtime.
pub const ACCEPTED_CURRENCIES: [Currency; 2] = [Currency::USD, Currency::GBP];

impl Currency {
    /// Returns the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::USD | Currency::EUR | Currency::GBP | Currency::INR => 2,
        }
    }

    /// Returns true if cards can be charged in this currency.
    pub fn is_accepted(&self) -> bool {
        ACCEPTED_CURRENCIES.contains(self)
    }

    /// Converts a major-unit amount (e.g. `10.50`) into minor units (`1050`).
    ///
    /// Returns `None` if the amount has more precision than the currency
    /// allows or does not fit in an `i64`.
    pub fn to_minor_units(&self, amount: Decimal) -> Option<i64> {
        let scaled = amount.checked_mul(Decimal::from(10_i64.pow(self.decimal_places())))?;
        if scaled.fract() != Decimal::ZERO {
            return None;
        }
        scaled.to_i64()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "INR" => Ok(Currency::INR),
            _ => Err(format!("Unknown currency: {}", s)),
        }
    }
}
