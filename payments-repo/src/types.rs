//! Shared database types for SQLite and PostgreSQL.
//!
//! SQLite has no native UUID or NUMERIC mapping, so its rows carry ids and
//! amounts as TEXT. Each backend gets its own row structs so both features
//! can be enabled in one build.

use payments_types::{Currency, RepoError};

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_currency(s: &str) -> Result<Currency, RepoError> {
    s.parse().map_err(RepoError::Database)
}

/// Maps a failed write, turning unique violations into `DuplicateKey`.
pub fn map_write_error(err: sqlx::Error) -> RepoError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::DuplicateKey(
            db.constraint()
                .map(String::from)
                .unwrap_or_else(|| db.message().to_string()),
        ),
        _ => RepoError::Database(err.to_string()),
    }
}

pub fn map_read_error(err: sqlx::Error) -> RepoError {
    RepoError::Database(err.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL rows
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "postgres")]
pub mod pg {
    use rust_decimal::Decimal;
    use sqlx::FromRow;
    use uuid::Uuid;

    use payments_types::{Customer, CustomerId, Payment, PaymentId, RepoError};

    use super::parse_currency;

    /// Customer row from database.
    #[derive(FromRow)]
    pub struct DbCustomer {
        pub id: Uuid,
        pub name: String,
        pub phone_number: String,
    }

    /// Payment row from database.
    #[derive(FromRow)]
    pub struct DbPayment {
        pub id: i64,
        pub customer_id: Uuid,
        pub amount: Decimal,
        pub currency: String,
        pub source: String,
        pub description: Option<String>,
    }

    impl DbCustomer {
        /// Convert database row to domain Customer.
        pub fn into_domain(self) -> Result<Customer, RepoError> {
            Ok(Customer::from_parts(
                CustomerId::from_uuid(self.id),
                self.name,
                self.phone_number,
            ))
        }
    }

    impl DbPayment {
        /// Convert database row to domain Payment.
        pub fn into_domain(self) -> Result<Payment, RepoError> {
            Ok(Payment {
                id: PaymentId::new(self.id),
                customer_id: CustomerId::from_uuid(self.customer_id),
                amount: self.amount,
                currency: parse_currency(&self.currency)?,
                source: self.source,
                description: self.description,
            })
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite rows
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "sqlite")]
pub mod lite {
    use rust_decimal::Decimal;
    use sqlx::FromRow;

    use payments_types::{Customer, CustomerId, Payment, PaymentId, RepoError};

    use super::parse_currency;

    /// Customer row from database.
    #[derive(FromRow)]
    pub struct DbCustomer {
        pub id: String,
        pub name: String,
        pub phone_number: String,
    }

    /// Payment row from database.
    #[derive(FromRow)]
    pub struct DbPayment {
        pub id: i64,
        pub customer_id: String,
        pub amount: String,
        pub currency: String,
        pub source: String,
        pub description: Option<String>,
    }

    fn parse_customer_id(s: &str) -> Result<CustomerId, RepoError> {
        s.parse()
            .map_err(|e: uuid::Error| RepoError::Database(e.to_string()))
    }

    impl DbCustomer {
        /// Convert database row to domain Customer.
        pub fn into_domain(self) -> Result<Customer, RepoError> {
            let id = parse_customer_id(&self.id)?;
            Ok(Customer::from_parts(id, self.name, self.phone_number))
        }
    }

    impl DbPayment {
        /// Convert database row to domain Payment.
        pub fn into_domain(self) -> Result<Payment, RepoError> {
            let amount: Decimal = self
                .amount
                .parse()
                .map_err(|e: rust_decimal::Error| RepoError::Database(e.to_string()))?;

            Ok(Payment {
                id: PaymentId::new(self.id),
                customer_id: parse_customer_id(&self.customer_id)?,
                amount,
                currency: parse_currency(&self.currency)?,
                source: self.source,
                description: self.description,
            })
        }
    }
}
