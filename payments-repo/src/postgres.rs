//! PostgreSQL repository adapter.

use async_trait::async_trait;
use sqlx::PgPool;

use payments_types::{
    Customer, CustomerId, CustomerRepository, NewPayment, Payment, PaymentId, PaymentRepository,
    RepoError,
};

use crate::types::pg::{DbCustomer, DbPayment};
use crate::types::{map_read_error, map_write_error};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository. Phone-number uniqueness is enforced by the
/// `customers_phone_number_key` constraint.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_customers_pg.sql"),
        "0001",
    )
    .await?;

    execute_migration(
        pool,
        include_str!("../migrations/0002_create_payments_pg.sql"),
        "0002",
    )
    .await?;

    Ok(())
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        tracing::debug!("postgres repository ready");
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        run_migrations(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl CustomerRepository for PostgresRepo {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepoError> {
        let row: Option<DbCustomer> =
            sqlx::query_as(r#"SELECT id, name, phone_number FROM customers WHERE id = $1"#)
                .bind(id.into_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_read_error)?;

        row.map(DbCustomer::into_domain).transpose()
    }

    async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<Customer>, RepoError> {
        let row: Option<DbCustomer> = sqlx::query_as(
            r#"SELECT id, name, phone_number FROM customers WHERE phone_number = $1"#,
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_read_error)?;

        row.map(DbCustomer::into_domain).transpose()
    }

    async fn insert(&self, customer: Customer) -> Result<(), RepoError> {
        sqlx::query(r#"INSERT INTO customers (id, name, phone_number) VALUES ($1, $2, $3)"#)
            .bind(customer.id.into_uuid())
            .bind(&customer.name)
            .bind(&customer.phone_number)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(())
    }
}

#[async_trait]
impl PaymentRepository for PostgresRepo {
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        let row: Option<DbPayment> = sqlx::query_as(
            r#"SELECT id, customer_id, amount, currency, source, description FROM payments WHERE id = $1"#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_read_error)?;

        row.map(DbPayment::into_domain).transpose()
    }

    async fn insert(&self, payment: NewPayment) -> Result<PaymentId, RepoError> {
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO payments (customer_id, amount, currency, source, description)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(payment.customer_id.into_uuid())
        .bind(payment.amount)
        .bind(payment.currency.to_string())
        .bind(&payment.source)
        .bind(&payment.description)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(PaymentId::new(id))
    }
}
