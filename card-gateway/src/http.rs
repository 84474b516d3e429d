//! HTTP card processor client.

use std::time::Duration;

use async_trait::async_trait;
use payments_types::{CardPaymentCharge, CardPaymentCharger, Currency, GatewayError};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Charges cards through a hosted processor's `/v1/charges` endpoint.
///
/// Amounts are sent in minor units with a lowercase currency code, as form
/// fields, authenticated with a bearer secret key.
pub struct HttpCardCharger {
    base_url: String,
    api_key: String,
    http: Client,
}

#[derive(Deserialize)]
struct ChargeResponse {
    paid: bool,
}

impl HttpCardCharger {
    /// Creates a client with the given request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http,
        })
    }

    fn charges_url(&self) -> String {
        format!("{}/v1/charges", self.base_url)
    }
}

#[async_trait]
impl CardPaymentCharger for HttpCardCharger {
    async fn charge(
        &self,
        source: &str,
        amount: Decimal,
        currency: Currency,
        description: Option<&str>,
    ) -> Result<CardPaymentCharge, GatewayError> {
        let minor = currency.to_minor_units(amount).ok_or_else(|| {
            GatewayError::Provider(format!("{amount} {currency} has no minor-unit form"))
        })?;

        let mut form = vec![
            ("source", source.to_string()),
            ("amount", minor.to_string()),
            ("currency", currency.to_string().to_lowercase()),
        ];
        if let Some(description) = description {
            form.push(("description", description.to_string()));
        }

        tracing::debug!(amount = minor, %currency, "Sending card charge");

        let resp = self
            .http
            .post(self.charges_url())
            .bearer_auth(&self.api_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Card gateway request failed");
                GatewayError::Transport(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Card gateway returned an error");
            return Err(GatewayError::Provider(format!("{status}: {body}")));
        }

        let charge: ChargeResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::Provider(format!("Malformed charge response: {e}")))?;

        Ok(CardPaymentCharge::new(charge.paid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn charger(server: &MockServer) -> HttpCardCharger {
        HttpCardCharger::new(server.base_url(), "sk_test", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_paid_charge_is_debited() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/charges")
                    .header("authorization", "Bearer sk_test")
                    .body_contains("amount=10050")
                    .body_contains("currency=gbp")
                    .body_contains("source=x0x0x0x0x0");
                then.status(200)
                    .json_body(json!({ "id": "ch_1", "paid": true }));
            })
            .await;

        let charge = charger(&server)
            .charge("x0x0x0x0x0", dec!(100.50), Currency::GBP, Some("Food"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(charge.is_card_debited());
    }

    #[tokio::test]
    async fn test_unpaid_charge_is_not_debited() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/charges");
                then.status(200).json_body(json!({ "paid": false }));
            })
            .await;

        let charge = charger(&server)
            .charge("tok", dec!(1.00), Currency::USD, None)
            .await
            .unwrap();

        assert!(!charge.is_card_debited());
    }

    #[tokio::test]
    async fn test_error_status_is_provider_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/charges");
                then.status(401).body("invalid api key");
            })
            .await;

        let result = charger(&server)
            .charge("tok", dec!(1.00), Currency::USD, None)
            .await;

        assert!(matches!(result, Err(GatewayError::Provider(m)) if m.contains("invalid api key")));
    }

    #[tokio::test]
    async fn test_malformed_body_is_provider_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/charges");
                then.status(200).body("not json");
            })
            .await;

        let result = charger(&server)
            .charge("tok", dec!(1.00), Currency::USD, None)
            .await;

        assert!(matches!(result, Err(GatewayError::Provider(_))));
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_transport_error() {
        // Nothing listens on port 9 (discard) in the test environment.
        let charger =
            HttpCardCharger::new("http://127.0.0.1:9", "sk", Duration::from_secs(2)).unwrap();

        let result = charger.charge("tok", dec!(1.00), Currency::USD, None).await;

        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let charger =
            HttpCardCharger::new("http://gateway.local/", "sk", Duration::from_secs(1)).unwrap();

        assert_eq!(charger.charges_url(), "http://gateway.local/v1/charges");
    }
}
