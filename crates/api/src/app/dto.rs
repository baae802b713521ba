use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crm_core::{CustomerId, DomainError};
use crm_customers::Customer;

// -------------------------
// Request decoding
// -------------------------

/// Why a request body could not be turned into a `Customer`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("request body is empty")]
    Empty,
    #[error("malformed JSON at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("invalid customer at line {line}, column {column}: {message}")]
    Data {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("truncated JSON: {0}")]
    Eof(String),
    #[error(transparent)]
    InvalidId(#[from] DomainError),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        let (line, column, message) = (err.line(), err.column(), err.to_string());
        match err.classify() {
            serde_json::error::Category::Eof => DecodeError::Eof(message),
            serde_json::error::Category::Data => DecodeError::Data {
                line,
                column,
                message,
            },
            serde_json::error::Category::Syntax | serde_json::error::Category::Io => {
                DecodeError::Syntax {
                    line,
                    column,
                    message,
                }
            }
        }
    }
}

/// Wire shape of a customer in a request body. The id stays a plain string
/// until [`decode_customer`] validates it.
#[derive(Debug, Deserialize)]
struct CustomerPayload {
    id: String,
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    address: Option<String>,
}

impl TryFrom<CustomerPayload> for Customer {
    type Error = DomainError;

    fn try_from(payload: CustomerPayload) -> Result<Self, Self::Error> {
        Ok(Customer {
            id: CustomerId::try_from(payload.id)?,
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
        })
    }
}

/// Decode a request body into a `Customer`.
///
/// Runs before any store call, so a bad body never reaches the data-access layer.
pub fn decode_customer(body: &[u8]) -> Result<Customer, DecodeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DecodeError::Empty);
    }
    let payload: CustomerPayload = serde_json::from_slice(body)?;
    Ok(Customer::try_from(payload)?)
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "conflict")]
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "ok")]
    pub status: String,
    #[schema(example = "postgres")]
    pub backend: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_valid_body() {
        let c = decode_customer(br#"{"id":"c1","name":"Acme","email":"ops@acme.test"}"#).unwrap();
        assert_eq!(c, Customer::new("c1", "Acme").with_email("ops@acme.test"));
    }

    #[test]
    fn empty_body_is_rejected() {
        assert_eq!(decode_customer(b""), Err(DecodeError::Empty));
        assert_eq!(decode_customer(b"  \n"), Err(DecodeError::Empty));
    }

    #[test]
    fn syntax_errors_are_classified() {
        let err = decode_customer(br#"{"id": c1}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Syntax { line: 1, .. }), "got {err:?}");
    }

    #[test]
    fn wrong_types_are_data_errors() {
        let err = decode_customer(br#"{"id":"c1","name":42}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Data { .. }), "got {err:?}");

        let err = decode_customer(br#"{"name":"Acme"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::Data { .. }), "got {err:?}");
    }

    #[test]
    fn empty_id_is_rejected_before_the_store() {
        let err = decode_customer(br#"{"id":"","name":"Ghost"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidId(_)), "got {err:?}");
    }

    #[test]
    fn truncated_body_is_eof() {
        let err = decode_customer(br#"{"id":"c1","#).unwrap_err();
        assert!(matches!(err, DecodeError::Eof(_)), "got {err:?}");
    }
}
