//! Repository port traits.
//!
//! Adapters (Postgres, SQLite, InMemory) implement these traits.

use std::sync::Arc;

use crate::domain::{Customer, CustomerId, NewPayment, Payment, PaymentId};
use crate::error::RepoError;

/// Storage for customers.
///
/// Implementations MUST enforce phone-number uniqueness on `insert` and
/// report a violation as [`RepoError::DuplicateKey`]. Callers may look up
/// by phone number first, but only the store's constraint is race-free.
#[async_trait::async_trait]
pub trait CustomerRepository: Send + Sync + 'static {
    /// Gets a customer by ID.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepoError>;

    /// Gets the customer registered with this phone number, if any.
    async fn find_by_phone_number(&self, phone_number: &str)
    -> Result<Option<Customer>, RepoError>;

    /// Stores a new customer.
    async fn insert(&self, customer: Customer) -> Result<(), RepoError>;
}

/// Storage for payments.
#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
    /// Gets a payment by ID.
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError>;

    /// Stores a payment and returns the id the store assigned to it.
    async fn insert(&self, payment: NewPayment) -> Result<PaymentId, RepoError>;
}

#[async_trait::async_trait]
impl<T: CustomerRepository> CustomerRepository for Arc<T> {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepoError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<Customer>, RepoError> {
        (**self).find_by_phone_number(phone_number).await
    }

    async fn insert(&self, customer: Customer) -> Result<(), RepoError> {
        (**self).insert(customer).await
    }
}

#[async_trait::async_trait]
impl<T: PaymentRepository> PaymentRepository for Arc<T> {
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        (**self).find_by_id(id).await
    }

    async fn insert(&self, payment: NewPayment) -> Result<PaymentId, RepoError> {
        (**self).insert(payment).await
    }
}
