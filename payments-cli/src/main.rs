//! Payments CLI
//!
//! Command-line interface for the customer payments API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use payments_client::PaymentsClient;
use payments_types::{Currency, CustomerId, PaymentId};

#[derive(Parser)]
#[command(name = "payments")]
#[command(author, version, about = "Customer payments API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Payments API
    #[arg(
        long,
        env = "PAYMENTS_API_URL",
        default_value = "http://localhost:3000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Customer operations
    Customer {
        #[command(subcommand)]
        action: CustomerCommands,
    },
    /// Payment operations
    Payment {
        #[command(subcommand)]
        action: PaymentCommands,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum CustomerCommands {
    /// Register a customer (repeat registrations return the same customer)
    Register {
        /// Customer name
        #[arg(long)]
        name: String,
        /// UK phone number, e.g. +447000000000
        #[arg(long)]
        phone: String,
        /// Customer ID (UUID); generated by the server when omitted
        #[arg(long)]
        id: Option<CustomerId>,
    },
}

#[derive(Subcommand)]
enum PaymentCommands {
    /// Charge a customer's card
    Charge {
        /// Customer ID (UUID)
        #[arg(long)]
        customer: CustomerId,
        /// Amount in major units, e.g. 10.50
        #[arg(long)]
        amount: Decimal,
        /// Currency (USD or GBP are accepted)
        #[arg(long, default_value = "GBP")]
        currency: Currency,
        /// Card source token
        #[arg(long)]
        source: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Get payment details
    Get {
        /// Payment ID
        id: PaymentId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = PaymentsClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Customer { action } => match action {
            CustomerCommands::Register { name, phone, id } => {
                let customer = client.register_customer(id, &name, &phone).await?;
                println!("{}", serde_json::to_string_pretty(&customer)?);
            }
        },

        Commands::Payment { action } => match action {
            PaymentCommands::Charge {
                customer,
                amount,
                currency,
                source,
                description,
            } => {
                let payment = client
                    .charge_card(customer, amount, currency, &source, description)
                    .await?;
                println!("{}", serde_json::to_string_pretty(&payment)?);
            }
            PaymentCommands::Get { id } => {
                let payment = client.get_payment(id).await?;
                println!("{}", serde_json::to_string_pretty(&payment)?);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_payment_charge() {
        let cli = Cli::try_parse_from([
            "payments",
            "payment",
            "charge",
            "--customer",
            "00000000-0000-0000-0000-000000000001",
            "--amount",
            "10.50",
            "--currency",
            "usd",
            "--source",
            "tok_visa",
        ])
        .unwrap();

        let Commands::Payment {
            action:
                PaymentCommands::Charge {
                    amount,
                    currency,
                    source,
                    description,
                    ..
                },
        } = cli.command
        else {
            panic!("expected payment charge");
        };
        assert_eq!(amount, dec!(10.50));
        assert_eq!(currency, Currency::USD);
        assert_eq!(source, "tok_visa");
        assert!(description.is_none());
    }

    #[test]
    fn test_parse_customer_register_without_id() {
        let cli = Cli::try_parse_from([
            "payments",
            "customer",
            "register",
            "--name",
            "Tara",
            "--phone",
            "+447000000000",
        ])
        .unwrap();

        assert!(matches!(
            cli.command,
            Commands::Customer {
                action: CustomerCommands::Register { id: None, .. }
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_payment_id() {
        assert!(Cli::try_parse_from(["payments", "payment", "get", "abc"]).is_err());
    }
}
