use serde_json::Value;

use super::dto::{
    CredentialResult, EncodedVerificationSubmission, FieldConstraintEvaluation, PathEvaluation,
    ProcessedVerificationSubmission, ValidationCheck,
};
use crate::model::credential::{VerifiableCredential, VerifiablePresentation};
use crate::model::presentation_definition::{
    ConstraintField, InputDescriptor, PresentationDefinition, PresentationSubmission,
};
use crate::model::verification_request::ValidationFailure;
use crate::provider::credential_formatter::jwt_formatter::JWTFormatter;
use crate::provider::revocation::StatusList2021;
use crate::service::error::ServiceError;
use crate::util::jsonpath;
use crate::util::key_verification::KeyVerification;

/// Runs a submission through the full presentation-exchange check sequence:
/// signature verification, holder binding, the revocation gate and the
/// definition's constraint fields. Only signature and decoding problems
/// surface as errors; policy violations land in the returned failure list.
pub(crate) async fn validate_verification_submission(
    formatter: &JWTFormatter,
    key_verification: &KeyVerification,
    revocation: &StatusList2021,
    submission: &EncodedVerificationSubmission,
    definition: &PresentationDefinition,
) -> Result<ProcessedVerificationSubmission, ServiceError> {
    let presentation = formatter
        .extract_presentation(&submission.presentation, key_verification.clone())
        .await?;

    let mut credentials = Vec::with_capacity(presentation.verifiable_credential.len());
    for token in &presentation.verifiable_credential {
        credentials.push(
            formatter
                .extract_credential(token, key_verification.clone())
                .await?,
        );
    }

    let mut failures = vec![];

    check_holder_binding(&presentation, &credentials, &mut failures);
    check_revocation(revocation, &credentials, &mut failures).await?;

    let presentation_value =
        build_presentation_value(&submission.presentation_submission, &presentation, &credentials)?;

    let mut checks = vec![];
    for descriptor in &definition.input_descriptors {
        let candidates = candidate_values(
            &submission.presentation_submission,
            &descriptor.id,
            &presentation_value,
        );

        let credential_results = candidates
            .into_iter()
            .map(|value| evaluate_credential(descriptor, value))
            .collect();

        checks.push(ValidationCheck {
            descriptor_id: descriptor.id.clone(),
            credential_results,
        });
    }

    for (check, descriptor) in checks.iter().zip(&definition.input_descriptors) {
        if !check.passed() {
            failures.push(descriptor_failure(check, descriptor));
        }
    }

    Ok(ProcessedVerificationSubmission {
        accepted: failures.is_empty(),
        checks,
        failures,
    })
}

/// The presentation signer must be the subject of every presented
/// credential, otherwise a stolen credential could be replayed.
fn check_holder_binding(
    presentation: &VerifiablePresentation,
    credentials: &[VerifiableCredential],
    failures: &mut Vec<ValidationFailure>,
) {
    let mismatch = credentials
        .iter()
        .find(|credential| credential.credential_subject.id != presentation.holder);

    if let Some(credential) = mismatch {
        failures.push(ValidationFailure {
            message: "Presentation holder is not the subject.".to_string(),
            details: format!(
                "Credential subject `{}` does not match the presentation holder `{}`",
                credential.credential_subject.id, presentation.holder
            ),
        });
    }
}

async fn check_revocation(
    revocation: &StatusList2021,
    credentials: &[VerifiableCredential],
    failures: &mut Vec<ValidationFailure>,
) -> Result<(), ServiceError> {
    for credential in credentials {
        if revocation.is_revoked(credential, None).await? {
            failures.push(ValidationFailure {
                message: "Revoked Credentials".to_string(),
                details: "At least one of the provided verified credentials has been revoked"
                    .to_string(),
            });
            return Ok(());
        }
    }
    Ok(())
}

/// The JSON document descriptor-map paths are evaluated against.
fn build_presentation_value(
    submission: &Option<PresentationSubmission>,
    presentation: &VerifiablePresentation,
    credentials: &[VerifiableCredential],
) -> Result<Value, ServiceError> {
    let credential_values = credentials
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServiceError::MappingError(e.to_string()))?;

    Ok(serde_json::json!({
        "presentation_submission": submission,
        "presentation": {
            "@context": presentation.context,
            "type": presentation.r#type,
            "holder": presentation.holder,
            "verifiableCredential": credential_values,
        },
    }))
}

fn candidate_values<'a>(
    submission: &Option<PresentationSubmission>,
    descriptor_id: &str,
    presentation_value: &'a Value,
) -> Vec<&'a Value> {
    submission
        .iter()
        .flat_map(|submission| submission.descriptor_map.iter())
        .filter(|entry| entry.id == descriptor_id)
        .filter_map(|entry| jsonpath::evaluate(&entry.path, presentation_value))
        .collect()
}

/// Evaluates all constraint fields against one candidate credential,
/// stopping at the first failure.
fn evaluate_credential(descriptor: &InputDescriptor, value: &Value) -> CredentialResult {
    let subject = jsonpath::evaluate("$.credentialSubject.id", value)
        .and_then(|id| id.as_str())
        .map(ToOwned::to_owned);

    let fields: &[ConstraintField] = descriptor
        .constraints
        .as_ref()
        .map(|constraints| constraints.fields.as_slice())
        .unwrap_or_default();

    let mut field_evaluations = vec![];
    for field in fields {
        let evaluation = evaluate_field(field, value);
        let failed = !evaluation.passed();
        field_evaluations.push(evaluation);
        if failed {
            break;
        }
    }

    CredentialResult {
        subject,
        field_evaluations,
    }
}

/// The first path that resolves decides the field; remaining candidates are
/// never consulted.
fn evaluate_field(field: &ConstraintField, value: &Value) -> FieldConstraintEvaluation {
    let mut trace = vec![];

    for path in &field.path {
        match jsonpath::evaluate(path, value) {
            Some(resolved) => {
                let passed = field
                    .filter
                    .as_ref()
                    .map_or(true, |filter| filter.matches(resolved));

                let evaluation = PathEvaluation {
                    path: path.clone(),
                    value: Some(resolved.clone()),
                };
                trace.push(evaluation.clone());

                return FieldConstraintEvaluation {
                    purpose: field.purpose.clone(),
                    matched: passed.then_some(evaluation),
                    trace,
                };
            }
            None => trace.push(PathEvaluation {
                path: path.clone(),
                value: None,
            }),
        }
    }

    FieldConstraintEvaluation {
        purpose: field.purpose.clone(),
        matched: None,
        trace,
    }
}

fn descriptor_failure(check: &ValidationCheck, descriptor: &InputDescriptor) -> ValidationFailure {
    let purpose = check
        .credential_results
        .iter()
        .flat_map(|result| result.field_evaluations.iter())
        .find(|evaluation| !evaluation.passed())
        .and_then(|evaluation| evaluation.purpose.clone());

    match purpose {
        Some(purpose) => ValidationFailure {
            message: format!("Credential did not match constraint: {purpose}"),
            details: format!("Input descriptor `{}` was not satisfied", descriptor.id),
        },
        None => ValidationFailure {
            message: format!(
                "Credential failed to meet criteria specified by input descriptor {}",
                descriptor.id
            ),
            details: descriptor
                .purpose
                .clone()
                .or_else(|| descriptor.name.clone())
                .unwrap_or_else(|| "No matching credential was presented".to_string()),
        },
    }
}
