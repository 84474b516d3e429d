//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use payments_types::{
    Customer, CustomerId, CustomerRepository, NewPayment, Payment, PaymentId, PaymentRepository,
    RepoError,
};

use crate::types::lite::{DbCustomer, DbPayment};
use crate::types::{map_read_error, map_write_error};

const CUSTOMERS_DDL: &str = include_str!("../migrations/0001_create_customers.sql");
const PAYMENTS_DDL: &str = include_str!("../migrations/0002_create_payments.sql");

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        // Ensure on-disk SQLite target directory exists.
        if !in_memory {
            if let Some(path) = database_url.strip_prefix("sqlite://") {
                let path = path.split('?').next().unwrap_or(path);
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` is its own database, so keep exactly one alive.
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePool::connect_with(options).await?
        };

        let repo = Self { pool };
        repo.create_schema().await?;
        tracing::debug!(url = %database_url, "sqlite repository ready");
        Ok(repo)
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the database schema. Safe to call more than once.
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        sqlx::query(CUSTOMERS_DDL)
            .execute(&self.pool)
            .await
            .map_err(map_read_error)?;

        sqlx::query(PAYMENTS_DDL)
            .execute(&self.pool)
            .await
            .map_err(map_read_error)?;

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CustomerRepository for SqliteRepo {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepoError> {
        let row: Option<DbCustomer> =
            sqlx::query_as(r#"SELECT id, name, phone_number FROM customers WHERE id = ?"#)
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_read_error)?;

        row.map(DbCustomer::into_domain).transpose()
    }

    async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<Customer>, RepoError> {
        let row: Option<DbCustomer> =
            sqlx::query_as(r#"SELECT id, name, phone_number FROM customers WHERE phone_number = ?"#)
                .bind(phone_number)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_read_error)?;

        row.map(DbCustomer::into_domain).transpose()
    }

    async fn insert(&self, customer: Customer) -> Result<(), RepoError> {
        sqlx::query(r#"INSERT INTO customers (id, name, phone_number) VALUES (?, ?, ?)"#)
            .bind(customer.id.to_string())
            .bind(&customer.name)
            .bind(&customer.phone_number)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(())
    }
}

#[async_trait]
impl PaymentRepository for SqliteRepo {
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        let row: Option<DbPayment> = sqlx::query_as(
            r#"SELECT id, customer_id, amount, currency, source, description FROM payments WHERE id = ?"#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_read_error)?;

        row.map(DbPayment::into_domain).transpose()
    }

    async fn insert(&self, payment: NewPayment) -> Result<PaymentId, RepoError> {
        let result = sqlx::query(
            r#"INSERT INTO payments (customer_id, amount, currency, source, description) VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(payment.customer_id.to_string())
        .bind(payment.amount.to_string())
        .bind(payment.currency.to_string())
        .bind(&payment.source)
        .bind(&payment.description)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(PaymentId::new(result.last_insert_rowid()))
    }
}
