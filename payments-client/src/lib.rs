//! # Payments Client SDK
//!
//! A typed Rust client for the customer payments API.

use payments_types::{
    Currency, Customer, CustomerId, Payment, PaymentId, PaymentRequest, RegistrationRequest,
};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Payments API client.
pub struct PaymentsClient {
    base_url: String,
    http: Client,
}

impl PaymentsClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Registers a customer, or returns the existing one for a repeat registration.
    pub async fn register_customer(
        &self,
        id: Option<CustomerId>,
        name: &str,
        phone_number: &str,
    ) -> Result<Customer, ClientError> {
        let req = RegistrationRequest {
            id,
            name: name.to_string(),
            phone_number: phone_number.to_string(),
        };
        let resp = self
            .http
            .put(self.url("/api/v1/customer-registration"))
            .json(&req)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Charges a customer's card and returns the recorded payment.
    pub async fn charge_card(
        &self,
        customer_id: CustomerId,
        amount: Decimal,
        currency: Currency,
        source: &str,
        description: Option<String>,
    ) -> Result<Payment, ClientError> {
        let req = PaymentRequest {
            customer_id: Some(customer_id),
            amount,
            currency,
            source: source.to_string(),
            description,
        };
        let resp = self
            .http
            .post(self.url("/api/v1/payment"))
            .json(&req)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Gets a payment by ID.
    pub async fn get_payment(&self, id: PaymentId) -> Result<Payment, ClientError> {
        let resp = self
            .http
            .get(self.url(&format!("/api/v1/payment/{}", id)))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = PaymentsClient::new("http://localhost:3000");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_client_with_trailing_slash() {
        let client = PaymentsClient::new("http://localhost:3000/");
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_payment_url() {
        let client = PaymentsClient::new("http://localhost:3000");
        assert_eq!(
            client.url(&format!("/api/v1/payment/{}", PaymentId::new(7))),
            "http://localhost:3000/api/v1/payment/7"
        );
    }

    #[tokio::test]
    async fn test_register_customer_sends_put() {
        let server = MockServer::start_async().await;
        let customer = Customer::from_parts(
            CustomerId::new(),
            "Tara".into(),
            "+447000000000".into(),
        );
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/api/v1/customer-registration")
                    .json_body(json!({ "name": "Tara", "phone_number": "+447000000000" }));
                then.status(200).json_body(serde_json::to_value(&customer).unwrap());
            })
            .await;

        let client = PaymentsClient::new(server.base_url());
        let registered = client
            .register_customer(None, "Tara", "+447000000000")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(registered, customer);
    }

    #[tokio::test]
    async fn test_charge_card_surfaces_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/payment");
                then.status(402)
                    .json_body(json!({ "error": "Card was not debited", "code": 402 }));
            })
            .await;

        let client = PaymentsClient::new(server.base_url());
        let err = client
            .charge_card(CustomerId::new(), dec!(10.00), Currency::GBP, "tok", None)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(402));
        assert!(err.to_string().contains("Card was not debited"));
    }

    #[test]
    fn test_api_error_status() {
        let err = ClientError::Api {
            status: 409,
            message: "Phone number [+447000000000] is taken".into(),
        };
        assert_eq!(err.status(), Some(409));
    }
}
