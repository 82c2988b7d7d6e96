//! The outcome of evaluating one person at one site.

use crate::types::PresenceEventKind;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Why a person cannot be registered at a site.
///
/// The `Display` form is the text shown to reception staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    #[strum(to_string = "Invalid site")]
    InvalidSite,
    #[strum(to_string = "Closed case")]
    ClosedCase,
    #[strum(to_string = "Not currently a resident")]
    NotResident,
    #[strum(to_string = "Neither currently a resident nor active staff member")]
    NeitherResidentNorStaff,
}

/// Instructions for reception staff, one per applicable flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub heading: String,
    pub body: String,
}

/// Whether a person may be registered at a site, and in which direction.
///
/// The default value is the fully denied decision every evaluation starts
/// from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    pub valid: bool,
    pub error: Option<DenialReason>,
    pub allowed_in: bool,
    pub allowed_out: bool,
    pub advisories: Vec<Advisory>,
}

impl AccessDecision {
    pub fn denied(reason: DenialReason) -> Self {
        Self {
            error: Some(reason),
            ..Self::default()
        }
    }

    /// Active staff: both directions open, no advisories.
    pub fn staff() -> Self {
        Self {
            valid: true,
            error: None,
            allowed_in: true,
            allowed_out: true,
            advisories: Vec::new(),
        }
    }

    pub fn client(allowed_in: bool, allowed_out: bool, advisories: Vec<Advisory>) -> Self {
        Self {
            valid: true,
            error: None,
            allowed_in,
            allowed_out,
            advisories,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.map(|reason| reason.to_string())
    }

    /// Whether an event of `kind` may be recorded under this decision.
    /// A "seen" event only needs the person to be valid at the site.
    pub fn permits(&self, kind: PresenceEventKind) -> bool {
        if !self.valid {
            return false;
        }
        match kind {
            PresenceEventKind::CheckIn => self.allowed_in,
            PresenceEventKind::CheckOut => self.allowed_out,
            PresenceEventKind::Seen => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_decision_is_denied() {
        let decision = AccessDecision::default();
        assert!(!decision.valid);
        assert!(!decision.allowed_in);
        assert!(!decision.allowed_out);
        assert!(decision.advisories.is_empty());
        assert_eq!(decision.error, None);
    }

    #[test]
    fn test_denial_messages() {
        assert_eq!(DenialReason::InvalidSite.to_string(), "Invalid site");
        assert_eq!(DenialReason::ClosedCase.to_string(), "Closed case");
        assert_eq!(
            DenialReason::NotResident.to_string(),
            "Not currently a resident"
        );
        assert_eq!(
            AccessDecision::denied(DenialReason::NeitherResidentNorStaff).error_message(),
            Some("Neither currently a resident nor active staff member".to_string())
        );
    }

    #[test]
    fn test_permits_follows_direction() {
        let decision = AccessDecision::client(true, false, Vec::new());
        assert!(decision.permits(PresenceEventKind::CheckIn));
        assert!(!decision.permits(PresenceEventKind::CheckOut));
        assert!(decision.permits(PresenceEventKind::Seen));

        let denied = AccessDecision::denied(DenialReason::ClosedCase);
        assert!(!denied.permits(PresenceEventKind::Seen));
    }
}
