//! # Payments Hex
//!
//! Application services and HTTP adapter for the customer payments service.
//!
//! ## Architecture
//!
//! - `registration/` - Customer registration service
//! - `payment/` - Card payment service
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi/` - OpenAPI document served by the HTTP adapter
//!
//! The services are generic over the port traits in `payments_types`,
//! allowing different adapters to be injected.

pub mod inbound;
pub mod openapi;
pub mod payment;
pub mod registration;


pub use payment::PaymentService;
pub use registration::RegistrationService;
