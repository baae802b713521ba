use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crm_core::CustomerId;

/// A customer record, the unit of persistence.
///
/// Optional contact fields are omitted from JSON when absent, so a record
/// created as `{"id":"c1","name":"Acme"}` reads back in the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    #[schema(value_type = String, example = "c1")]
    pub id: CustomerId,
    #[schema(example = "Acme")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Customer {
    pub fn new(id: impl Into<CustomerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            phone: None,
            address: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Whole-record replacement: every descriptive field is overwritten from
    /// `incoming`, including clearing fields `incoming` leaves unset.
    ///
    /// The identifier is immutable, so `incoming.id` is ignored.
    pub fn replace_with(&mut self, incoming: Customer) {
        // Exhaustive destructure: a new field must be handled here.
        let Customer {
            id: _,
            name,
            email,
            phone,
            address,
        } = incoming;

        self.name = name;
        self.email = email;
        self.phone = phone;
        self.address = address;
    }
}
