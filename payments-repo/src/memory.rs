//! In-memory repository adapter.
//!
//! Backed by `DashMap`s. The phone-number index is claimed through an entry
//! lock, so concurrent inserts for one number cannot both succeed.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use payments_types::{
    Customer, CustomerId, CustomerRepository, NewPayment, Payment, PaymentId, PaymentRepository,
    RepoError,
};

/// In-memory repository implementation.
pub struct InMemoryRepo {
    customers: DashMap<CustomerId, Customer>,
    phone_index: DashMap<String, CustomerId>,
    payments: DashMap<PaymentId, Payment>,
    next_payment_id: AtomicI64,
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            customers: DashMap::new(),
            phone_index: DashMap::new(),
            payments: DashMap::new(),
            next_payment_id: AtomicI64::new(1),
        }
    }

    /// Number of stored customers.
    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    /// Number of stored payments.
    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }
}

#[async_trait]
impl CustomerRepository for InMemoryRepo {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepoError> {
        Ok(self.customers.get(&id).map(|c| c.clone()))
    }

    async fn find_by_phone_number(
        &self,
        phone_number: &str,
    ) -> Result<Option<Customer>, RepoError> {
        let Some(id) = self.phone_index.get(phone_number).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.customers.get(&id).map(|c| c.clone()))
    }

    async fn insert(&self, customer: Customer) -> Result<(), RepoError> {
        // Lock order is always phone index, then customers. The customer row
        // is written before the index entry becomes visible.
        match self.phone_index.entry(customer.phone_number.clone()) {
            Entry::Occupied(_) => Err(RepoError::DuplicateKey("customers.phone_number".into())),
            Entry::Vacant(slot) => match self.customers.entry(customer.id) {
                Entry::Occupied(_) => Err(RepoError::DuplicateKey("customers.id".into())),
                Entry::Vacant(row) => {
                    let id = customer.id;
                    row.insert(customer);
                    slot.insert(id);
                    Ok(())
                }
            },
        }
    }
}

#[async_trait]
impl PaymentRepository for InMemoryRepo {
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        Ok(self.payments.get(&id).map(|p| p.clone()))
    }

    async fn insert(&self, payment: NewPayment) -> Result<PaymentId, RepoError> {
        if !self.customers.contains_key(&payment.customer_id) {
            return Err(RepoError::Database(format!(
                "payment references unknown customer {}",
                payment.customer_id
            )));
        }

        let id = PaymentId::new(self.next_payment_id.fetch_add(1, Ordering::SeqCst));
        self.payments.insert(id, payment.into_payment(id));
        Ok(id)
    }
}
