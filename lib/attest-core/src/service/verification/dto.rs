use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

use crate::model::presentation_definition::PresentationSubmission;
use crate::model::verification_request::ValidationFailure;

/// Submission as received from a holder: a submission map plus the signed
/// presentation in JWT form.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncodedVerificationSubmission {
    pub presentation_submission: Option<PresentationSubmission>,
    pub presentation: String,
}

/// One constraint path attempt, kept for auditability of the decision.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEvaluation {
    pub path: String,
    pub value: Option<Value>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConstraintEvaluation {
    pub purpose: Option<String>,
    /// The winning path evaluation, absent when the constraint failed.
    pub matched: Option<PathEvaluation>,
    pub trace: Vec<PathEvaluation>,
}

impl FieldConstraintEvaluation {
    pub fn passed(&self) -> bool {
        self.matched.is_some()
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialResult {
    pub subject: Option<String>,
    pub field_evaluations: Vec<FieldConstraintEvaluation>,
}

impl CredentialResult {
    pub fn passed(&self) -> bool {
        self.field_evaluations
            .iter()
            .all(FieldConstraintEvaluation::passed)
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationCheck {
    pub descriptor_id: String,
    pub credential_results: Vec<CredentialResult>,
}

impl ValidationCheck {
    /// A descriptor is satisfied by any one matching credential.
    pub fn passed(&self) -> bool {
        self.credential_results.iter().any(CredentialResult::passed)
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedVerificationSubmission {
    pub accepted: bool,
    pub checks: Vec<ValidationCheck>,
    pub failures: Vec<ValidationFailure>,
}
