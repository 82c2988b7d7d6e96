//! Flag aggregation for case holders.
//!
//! A failed flag read is returned as an error rather than treated as "no
//! flags", so a deny flag that cannot be read never opens a direction.

use errors::StorageError;
use site_core::decision::Advisory;
use site_core::traits::FlagRepository;
use site_core::types::{CaseFlag, PersonId, PresenceState};
use std::sync::Arc;

/// Merged effect of every flag assigned to a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDirectives {
    pub allowed_in: bool,
    pub allowed_out: bool,
    pub advisories: Vec<Advisory>
}

impl Default for FlagDirectives {
    fn default() -> Self {
        Self {
            allowed_in: true,
            allowed_out: true,
            advisories: Vec::new()
        }
    }
}

impl FlagDirectives {
    /// Folds `flags` in order. Denies are sticky: once a flag closes a
    /// direction no later flag reopens it.
    pub fn fold<'a>(
        flags: impl IntoIterator<Item = &'a CaseFlag>,
        presence: PresenceState,
        placeholder: &str
    ) -> Self {
        flags
            .into_iter()
            .fold(Self::default(), |mut acc, flag| {
                acc.allowed_in &= !flag.deny_check_in;
                acc.allowed_out &= !flag.deny_check_out;
                if flag.advises_at(presence) {
                    acc.advisories.push(Advisory {
                        heading: flag.name.clone(),
                        body: flag.instructions_or(placeholder)
                    });
                }
                acc
            })
    }
}

pub struct FlagAggregator {
    flags: Arc<dyn FlagRepository>,
    placeholder: String
}

impl FlagAggregator {
    pub fn new(flags: Arc<dyn FlagRepository>, placeholder: impl Into<String>) -> Self {
        Self {
            flags,
            placeholder: placeholder.into()
        }
    }

    pub async fn directives(
        &self,
        person_id: PersonId,
        presence: PresenceState
    ) -> Result<FlagDirectives, StorageError> {
        let flags = self.flags.flags_for_person(person_id).await?;
        Ok(FlagDirectives::fold(
            flags.iter().filter(|flag| !flag.deleted),
            presence,
            &self.placeholder
        ))
    }
}
