use serde::{Deserialize, Serialize};
use shared_types::VerificationRequestId;
use time::OffsetDateTime;

use super::presentation_definition::PresentationDefinition;

/// One human-readable reason a submission was rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub message: String,
    pub details: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    /// Approved and rejected requests never change state again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, VerificationStatus::Approved | VerificationStatus::Rejected)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub id: VerificationRequestId,
    pub presentation_definition: PresentationDefinition,
    pub status: VerificationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified: OffsetDateTime,
    #[serde(default)]
    pub failures: Vec<ValidationFailure>,
}
