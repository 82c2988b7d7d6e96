use errors::StorageError;
use site_core::{DenialReason, PresenceEventKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Registration rejected: {0}")]
    Rejected(#[from] RegistrationRejected)
}

/// Why a presence event was not recorded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationRejected {
    #[error("{reason}")]
    NotPermitted { reason: DenialReason },

    #[error("Direction denied: {kind}")]
    DirectionDenied { kind: PresenceEventKind }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        let err = AccessError::from(RegistrationRejected::NotPermitted {
            reason: DenialReason::ClosedCase
        });
        assert_eq!(err.to_string(), "Registration rejected: Closed case");

        let err = RegistrationRejected::DirectionDenied {
            kind: PresenceEventKind::CheckOut
        };
        assert_eq!(err.to_string(), "Direction denied: check_out");
    }

    #[test]
    fn test_storage_error_wraps() {
        let err: AccessError = StorageError::query("memory", "boom").into();
        assert!(matches!(err, AccessError::Storage(_)));
        assert!(err.to_string().contains("boom"));
    }
}
