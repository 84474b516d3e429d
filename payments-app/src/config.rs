//! Configuration loading from environment.

use std::env;
use std::time::Duration;

/// Which card charger the server talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayConfig {
    /// In-process charger that debits every card except `declined` sources.
    Fake { declined: Vec<String> },
    /// Hosted card processor.
    Http {
        base_url: String,
        api_key: String,
        timeout: Duration,
    },
}

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub gateway: GatewayConfig,
    pub rate_limit_per_minute: u32,
    /// OTLP endpoint; tracing export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("PORT is not a valid port: {e}"))?;

        let database_url = var("DATABASE_URL").unwrap_or_else(|| "memory://".to_string());

        let rate_limit_per_minute = var("RATE_LIMIT_PER_MINUTE")
            .unwrap_or_else(|| "100".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("RATE_LIMIT_PER_MINUTE is not a number: {e}"))?;

        let gateway = match var("CARD_GATEWAY").as_deref().unwrap_or("fake") {
            "fake" => GatewayConfig::Fake {
                declined: var("CARD_GATEWAY_DECLINED_SOURCES")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            "http" => {
                let base_url = var("CARD_GATEWAY_URL").ok_or_else(|| {
                    anyhow::anyhow!("CARD_GATEWAY_URL is required when CARD_GATEWAY=http")
                })?;
                let api_key = var("CARD_GATEWAY_API_KEY").ok_or_else(|| {
                    anyhow::anyhow!("CARD_GATEWAY_API_KEY is required when CARD_GATEWAY=http")
                })?;
                let timeout_secs: u64 = var("CARD_GATEWAY_TIMEOUT_SECS")
                    .unwrap_or_else(|| "10".to_string())
                    .parse()
                    .map_err(|e| anyhow::anyhow!("CARD_GATEWAY_TIMEOUT_SECS is not a number: {e}"))?;

                GatewayConfig::Http {
                    base_url,
                    api_key,
                    timeout: Duration::from_secs(timeout_secs),
                }
            }
            other => anyhow::bail!("CARD_GATEWAY must be `fake` or `http`, got `{other}`"),
        };

        let otlp_endpoint = var("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|s| !s.is_empty());

        Ok(Self {
            port,
            database_url,
            gateway,
            rate_limit_per_minute,
            otlp_endpoint,
        })
    }
}
