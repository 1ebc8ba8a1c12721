//! Online customer upsert request.

use serde::Deserialize;

use super::{ValidationError, require_text};

/// Body of `POST /api/customers`.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// A validated customer upsert, keyed by `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerUpsert {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl TryFrom<CustomerRequest> for CustomerUpsert {
    type Error = ValidationError;

    fn try_from(request: CustomerRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: require_text("name", &request.name)?,
            address: require_text("address", &request.address)?,
            phone: require_text("phone", &request.phone)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_trims_fields() {
        let upsert = CustomerUpsert::try_from(CustomerRequest {
            name: " Siti Rahma ".to_string(),
            address: "Jl. Merdeka 1, Bandung".to_string(),
            phone: "0812-1111-2222".to_string(),
        })
        .unwrap();

        assert_eq!(upsert.name, "Siti Rahma");
    }

    #[test]
    fn test_validation_rejects_blank_phone() {
        let err = CustomerUpsert::try_from(CustomerRequest {
            name: "Siti Rahma".to_string(),
            address: "Jl. Merdeka 1, Bandung".to_string(),
            phone: String::new(),
        })
        .unwrap_err();

        assert_eq!(err.to_string(), "phone is required");
    }
}
