//! Customer domain model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::phone;
use crate::error::DomainError;

/// Unique identifier for a Customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CustomerId(Uuid);

impl CustomerId {
    /// Creates a new random CustomerId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a CustomerId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CustomerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A registered customer.
///
/// The phone number is unique across customers; the store enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: CustomerId,
    /// Display name
    #[schema(example = "Tara")]
    pub name: String,
    #[schema(example = "+447000000000")]
    pub phone_number: String,
}

impl Customer {
    /// Creates a customer, generating an id when none is given.
    ///
    /// # Validation
    /// - Name cannot be empty
    /// - Phone number must pass [`phone::is_valid`]
    pub fn new(
        id: Option<CustomerId>,
        name: String,
        phone_number: String,
    ) -> Result<Self, DomainError> {
        if !phone::is_valid(&phone_number) {
            return Err(DomainError::InvalidPhoneNumber(phone_number));
        }
        if name.trim().is_empty() {
            return Err(DomainError::Validation("Customer name cannot be empty".into()));
        }

        Ok(Self {
            id: id.unwrap_or_default(),
            name,
            phone_number,
        })
    }

    /// Creates a customer with all fields specified (for database reconstruction).
    pub fn from_parts(id: CustomerId, name: String, phone_number: String) -> Self {
        Self {
            id,
            name,
            phone_number,
        }
    }

    /// Returns true if `name` is exactly this customer's name (case-sensitive).
    pub fn has_name(&self, name: &str) -> bool {
        self.name == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_creation_keeps_given_id() {
        let id = CustomerId::new();
        let customer =
            Customer::new(Some(id), "Tara".into(), "+447000000000".into()).unwrap();
        assert_eq!(customer.id, id);
        assert_eq!(customer.name, "Tara");
    }

    #[test]
    fn test_customer_creation_generates_missing_id() {
        let a = Customer::new(None, "Tara".into(), "+447000000000".into()).unwrap();
        let b = Customer::new(None, "Tara".into(), "+447000000000".into()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_empty_name_fails() {
        let result = Customer::new(None, "  ".into(), "+447000000000".into());
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_invalid_phone_fails() {
        let result = Customer::new(None, "Tara".into(), "+447".into());
        assert!(matches!(result, Err(DomainError::InvalidPhoneNumber(p)) if p == "+447"));
    }

    #[test]
    fn test_name_match_is_case_sensitive() {
        let customer = Customer::from_parts(CustomerId::new(), "Tara".into(), "+447000000000".into());
        assert!(customer.has_name("Tara"));
        assert!(!customer.has_name("tara"));
    }
}
