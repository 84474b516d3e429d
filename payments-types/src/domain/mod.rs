//! Domain models for the customer payments service.

pub mod currency;
pub mod customer;
pub mod payment;
pub mod phone;

pub use currency::{ACCEPTED_CURRENCIES, Currency};
pub use customer::{Customer, CustomerId};
pub use payment::{CardPaymentCharge, NewPayment, Payment, PaymentId};
