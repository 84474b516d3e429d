//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use payments_types::domain::{Currency, Customer, CustomerId, Payment, PaymentId};
use payments_types::dto::{PaymentRequest, RegistrationRequest};
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Register a customer
///
/// Repeating a registration with the same name and phone number returns the
/// existing customer without writing anything.
#[utoipa::path(
    put,
    path = "/api/v1/customer-registration",
    tag = "customers",
    request_body = RegistrationRequest,
    responses(
        (status = 200, description = "Customer registered (or already registered)", body = Customer),
        (status = 400, description = "Invalid phone number or name"),
        (status = 409, description = "Phone number is taken by another customer")
    )
)]
async fn register_customer() {}

/// Charge a customer's card
#[utoipa::path(
    post,
    path = "/api/v1/payment",
    tag = "payments",
    request_body = PaymentRequest,
    responses(
        (status = 200, description = "Card charged and payment recorded", body = Payment),
        (status = 400, description = "Invalid request or unsupported currency"),
        (status = 402, description = "Card was not debited"),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Card charged but payment not recorded"),
        (status = 502, description = "Card gateway failure")
    )
)]
async fn make_payment() {}

/// Get payment by ID
#[utoipa::path(
    get,
    path = "/api/v1/payment/{id}",
    tag = "payments",
    params(
        ("id" = PaymentId, Path, description = "Payment ID")
    ),
    responses(
        (status = 200, description = "Payment details", body = Payment),
        (status = 400, description = "Malformed payment ID"),
        (status = 404, description = "Payment not found")
    )
)]
async fn get_payment() {}

/// OpenAPI documentation for the customer payments API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Customer Payments API",
        version = "1.0.0",
        description = "Registers customers and charges their cards. Only USD and GBP can be charged; phone numbers must be UK numbers in `+44` form.",
        license(name = "MIT"),
    ),
    paths(health, register_customer, make_payment, get_payment),
    components(schemas(
        RegistrationRequest,
        PaymentRequest,
        Customer,
        Payment,
        Currency,
        CustomerId,
        PaymentId,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "customers", description = "Customer registration"),
        (name = "payments", description = "Card payments"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| *p == "/api/v1/customer-registration"));
        assert!(paths.iter().any(|p| *p == "/api/v1/payment"));
        assert!(paths.iter().any(|p| *p == "/api/v1/payment/{id}"));
    }
}
