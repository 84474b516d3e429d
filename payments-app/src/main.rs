//! # Payments Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository adapter and card charger
//! - Create the registration and payment services
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use card_gateway::{FakeCardCharger, HttpCardCharger};
use payments_hex::{PaymentService, RegistrationService, inbound::HttpServer};
use payments_repo::{Repo, build_repo};
use payments_types::CardPaymentCharger;

use config::{Config, GatewayConfig};

fn init_tracer(
    endpoint: &str,
) -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("payments-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // OpenTelemetry export only when a collector is configured
    let otel = config
        .otlp_endpoint
        .as_deref()
        .map(init_tracer)
        .transpose()?;
    let (telemetry, otel_provider) = match otel {
        Some((tracer, provider)) => (
            Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            Some(provider),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,payments_app=debug,payments_hex=debug,card_gateway=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    tracing::info!("Starting payments server on port {}", config.port);

    // Build repository (handles connection and migration)
    let repo = Arc::new(build_repo(&config.database_url).await?);
    tracing::info!(adapter = repo.kind(), "Repository ready");

    match &config.gateway {
        GatewayConfig::Fake { declined } => {
            tracing::warn!("Using the fake card charger; no card is really debited");
            let charger = declined
                .iter()
                .fold(FakeCardCharger::new(), |charger, source| {
                    charger.declining(source.as_str())
                });
            serve(&config, repo, charger).await?;
        }
        GatewayConfig::Http {
            base_url,
            api_key,
            timeout,
        } => {
            tracing::info!(gateway = %base_url, "Using HTTP card charger");
            let charger = HttpCardCharger::new(base_url.as_str(), api_key.as_str(), *timeout)?;
            serve(&config, repo, charger).await?;
        }
    }

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    Ok(())
}

async fn serve<G: CardPaymentCharger>(
    config: &Config,
    repo: Arc<Repo>,
    charger: G,
) -> anyhow::Result<()> {
    let registration = RegistrationService::new(repo.clone());
    let payments = PaymentService::new(repo.clone(), repo, charger);

    let server = HttpServer::with_rate_limit(registration, payments, config.rate_limit_per_minute);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await
}
