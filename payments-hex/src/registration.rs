//! Customer Registration Service
//!
//! Validates and deduplicates customer registrations.
//! Contains NO infrastructure logic - pure business orchestration.

use payments_types::{AppError, Customer, CustomerRepository, RegistrationRequest, RepoError};

/// Application service for customer registration.
///
/// Generic over `C: CustomerRepository` - the adapter is injected at compile time.
pub struct RegistrationService<C: CustomerRepository> {
    customers: C,
}

impl<C: CustomerRepository> RegistrationService<C> {
    pub fn new(customers: C) -> Self {
        Self { customers }
    }

    /// Registers a customer, or returns the existing one for a repeated request.
    ///
    /// Writes at most once, and only when the phone number is not yet taken.
    pub async fn register(&self, req: RegistrationRequest) -> Result<Customer, AppError> {
        // Validation runs before any store access.
        let candidate = Customer::new(req.id, req.name, req.phone_number)?;

        if let Some(existing) = self
            .customers
            .find_by_phone_number(&candidate.phone_number)
            .await?
        {
            return Self::resolve_existing(existing, &candidate);
        }

        match self.customers.insert(candidate.clone()).await {
            Ok(()) => {
                tracing::info!(customer_id = %candidate.id, "Registered new customer");
                Ok(candidate)
            }
            Err(RepoError::DuplicateKey(key)) => {
                // Lost a race against a concurrent registration for this number.
                tracing::debug!(%key, "Insert hit uniqueness constraint, re-reading");
                match self
                    .customers
                    .find_by_phone_number(&candidate.phone_number)
                    .await?
                {
                    Some(existing) => Self::resolve_existing(existing, &candidate),
                    None => Err(AppError::DuplicateKey(RepoError::DuplicateKey(key))),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    fn resolve_existing(existing: Customer, candidate: &Customer) -> Result<Customer, AppError> {
        if existing.has_name(&candidate.name) {
            // client might have sent the request twice
            tracing::debug!(customer_id = %existing.id, "Duplicate registration ignored");
            return Ok(existing);
        }

        tracing::warn!(phone_number = %candidate.phone_number, "Phone number already taken");
        Err(AppError::Conflict(format!(
            "Phone number [{}] is taken",
            candidate.phone_number
        )))
    }
}
