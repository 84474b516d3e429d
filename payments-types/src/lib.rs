//! # Payments Types
//!
//! Domain types and port traits for the customer payments service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Customer, Payment, Currency) and the phone rule
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain, repository, gateway and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    ACCEPTED_CURRENCIES, CardPaymentCharge, Currency, Customer, CustomerId, NewPayment, Payment,
    PaymentId, phone,
};
pub use dto::*;
pub use error::{AppError, DomainError, GatewayError, RepoError};
pub use ports::{CardPaymentCharger, CustomerRepository, PaymentRepository};
