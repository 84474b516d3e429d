//! Client example demonstrating registration and card payments against a running server.
//!
//! Run with: cargo run -p payments-app --example client_example

use std::net::SocketAddr;
use std::sync::Arc;

use card_gateway::FakeCardCharger;
use payments_client::PaymentsClient;
use payments_hex::{PaymentService, RegistrationService, inbound::HttpServer};
use payments_repo::build_repo;
use payments_types::Currency;
use rust_decimal_macros::dec;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;

    println!("🚀 Starting server on {addr}...");

    let repo = Arc::new(build_repo("memory://").await?);
    let charger = FakeCardCharger::new().declining("tok_chargeDeclined");

    let registration = RegistrationService::new(repo.clone());
    let payments = PaymentService::new(repo.clone(), repo, charger);
    let router = HttpServer::new(registration, payments).router();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router.into_make_service()).await {
            eprintln!("server error: {e}");
        }
    });

    let client = PaymentsClient::new(format!("http://{addr}"));

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: registration and payment flow
    // ─────────────────────────────────────────────────────────────────────────

    let health = client.health().await?;
    println!("✅ Server health: {health}");

    let tara = client
        .register_customer(None, "Tara", "+447000000000")
        .await?;
    println!("✅ Registered customer: {} (id={})", tara.name, tara.id);

    let again = client
        .register_customer(None, "Tara", "+447000000000")
        .await?;
    assert_eq!(again.id, tara.id);
    println!("✅ Repeat registration returned the same customer");

    let taken = client
        .register_customer(None, "Mika", "+447000000000")
        .await;
    println!("✅ Taken phone number rejected: {}", taken.unwrap_err());

    let payment = client
        .charge_card(
            tara.id,
            dec!(100.00),
            Currency::GBP,
            "x0x0x0x0x0",
            Some("Food".into()),
        )
        .await?;
    println!(
        "✅ Charged {} {} (payment={})",
        payment.amount, payment.currency, payment.id
    );

    let fetched = client.get_payment(payment.id).await?;
    println!("   Fetched payment {}: {:?}", fetched.id, fetched.description);

    let euros = client
        .charge_card(tara.id, dec!(10.00), Currency::EUR, "x0x0x0x0x0", None)
        .await;
    println!("✅ EUR charge rejected: {}", euros.unwrap_err());

    let declined = client
        .charge_card(tara.id, dec!(10.00), Currency::USD, "tok_chargeDeclined", None)
        .await;
    println!("✅ Declined card rejected: {}", declined.unwrap_err());

    println!("\n🎉 Example completed successfully!");

    Ok(())
}
