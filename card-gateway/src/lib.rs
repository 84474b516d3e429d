//! # Card Gateway
//!
//! Adapters for the `CardPaymentCharger` port.
//!
//! - [`HttpCardCharger`] talks to a hosted card processor over HTTP.
//! - [`FakeCardCharger`] debits in process, for development and tests.
//!
//! # Example
//! ```
//! use card_gateway::FakeCardCharger;
//!
//! let charger = FakeCardCharger::new().declining("tok_chargeDeclined");
//! assert!(charger.declines("tok_chargeDeclined"));
//! ```

mod fake;
mod http;

pub use fake::FakeCardCharger;
pub use http::HttpCardCharger;
