//! # Site Access Errors
//!
//! Infrastructure and record-validation errors shared by the site access
//! crates.
//!
//! Domain denials (closed case, not resident, ...) are not errors: they are
//! reported as values inside an access decision. The enums here cover what
//! can actually fail: talking to a backend, and building a record from
//! incomplete data.

use thiserror::Error;

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Connection to {backend} failed: {reason}")]
    ConnectionError { backend: String, reason: String },

    #[error("Query on {backend} failed: {reason}")]
    QueryError { backend: String, reason: String },

    #[error("Decoding {entity} from {backend} failed: {reason}")]
    DecodeError {
        backend: String,
        entity: String,
        reason: String
    }
}

impl StorageError {
    pub fn query(backend: &str, reason: impl Into<String>) -> Self {
        Self::QueryError {
            backend: backend.to_string(),
            reason: reason.into()
        }
    }

    pub fn decode(backend: &str, entity: &str, reason: impl Into<String>) -> Self {
        Self::DecodeError {
            backend: backend.to_string(),
            entity: entity.to_string(),
            reason: reason.into()
        }
    }
}

/// Record construction errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Missing required field: {entity}.{field}")]
    MissingField { entity: String, field: String },

    #[error("Invalid value for {entity}.{field}: {reason}")]
    InvalidValue {
        entity: String,
        field: String,
        reason: String
    },

    #[error("Unknown {kind} code: {code}")]
    UnknownCode { kind: String, code: String }
}

impl RecordError {
    pub fn missing(entity: &str, field: &str) -> Self {
        Self::MissingField {
            entity: entity.to_string(),
            field: field.to_string()
        }
    }

    pub fn invalid(entity: &str, field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            entity: entity.to_string(),
            field: field.to_string(),
            reason: reason.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::query("postgres", "relation \"cases\" does not exist");
        assert_eq!(
            err.to_string(),
            "Query on postgres failed: relation \"cases\" does not exist"
        );

        let err = StorageError::decode("postgres", "site", "unknown kind: depot");
        assert_eq!(
            err.to_string(),
            "Decoding site from postgres failed: unknown kind: depot"
        );
    }

    #[test]
    fn test_record_error_display() {
        assert_eq!(
            RecordError::missing("case_flag", "name").to_string(),
            "Missing required field: case_flag.name"
        );
        assert_eq!(
            RecordError::UnknownCode {
                kind: "registration status".to_string(),
                code: "7".to_string()
            }
            .to_string(),
            "Unknown registration status code: 7"
        );
    }
}
