use shared_types::DidValue;
use uuid::Uuid;

use crate::model::attestation::{
    CREDIT_SCORE_ATTESTATION_TYPE, KYC_AML_ATTESTATION_TYPE, attestation_schema_uri,
};
use crate::model::presentation_definition::{
    ConstraintField, ConstraintFilter, ConstraintStatuses, Constraints, DescriptorMapEntry,
    FilterType, InputDescriptor, PresentationDefinition, PresentationSubmission, SchemaReference,
    StatusConstraint, StatusDirective,
};
use crate::service::issuance::mapper::jwt_format_designations;

pub const TRUSTED_ISSUER_PURPOSE: &str =
    "We can only verify credentials attested by a trusted authority.";

/// Definition asking for a KYC/AML attestation from one of the given
/// trusted issuers.
pub fn kyc_presentation_definition(trusted_issuers: &[DidValue]) -> PresentationDefinition {
    let mut fields = vec![ConstraintField {
        path: attestation_field_paths(KYC_AML_ATTESTATION_TYPE, "approvalDate"),
        purpose: Some(
            "The KYC/AML Attestation requires the field: 'approvalDate'.".to_string(),
        ),
        predicate: None,
        filter: Some(ConstraintFilter {
            r#type: Some(FilterType::String),
            pattern: None,
            minimum: None,
        }),
    }];
    if let Some(field) = trusted_issuer_field(trusted_issuers) {
        fields.push(field);
    }

    PresentationDefinition {
        id: "KYCAMLPresentationDefinition".to_string(),
        input_descriptors: vec![InputDescriptor {
            id: "kycaml_input".to_string(),
            name: Some("Proof of KYC".to_string()),
            purpose: Some("Please provide a valid credential from a KYC/AML issuer".to_string()),
            schema: vec![SchemaReference {
                uri: attestation_schema_uri(KYC_AML_ATTESTATION_TYPE),
                required: Some(true),
            }],
            constraints: Some(Constraints {
                fields,
                statuses: Some(revoked_disallowed()),
            }),
        }],
        format: Some(jwt_format_designations()),
    }
}

/// Definition asking for a credit score attestation, optionally gated on a
/// minimum score (inclusive).
pub fn credit_score_presentation_definition(
    trusted_issuers: &[DidValue],
    minimum_score: Option<f64>,
) -> PresentationDefinition {
    let score_purpose = match minimum_score {
        Some(minimum) => {
            format!("We can only verify Credit Score credentials that are above {minimum}.")
        }
        None => "The Credit Score Attestation requires the field: 'score'.".to_string(),
    };

    let mut fields = vec![ConstraintField {
        path: attestation_field_paths(CREDIT_SCORE_ATTESTATION_TYPE, "score"),
        purpose: Some(score_purpose),
        predicate: None,
        filter: Some(ConstraintFilter {
            r#type: Some(FilterType::Number),
            pattern: None,
            minimum: minimum_score,
        }),
    }];
    if let Some(field) = trusted_issuer_field(trusted_issuers) {
        fields.push(field);
    }

    PresentationDefinition {
        id: "CreditScorePresentationDefinition".to_string(),
        input_descriptors: vec![InputDescriptor {
            id: "creditScore_input".to_string(),
            name: Some("Proof of Credit Score".to_string()),
            purpose: Some(
                "Please provide a valid credential from a credit score issuer".to_string(),
            ),
            schema: vec![SchemaReference {
                uri: attestation_schema_uri(CREDIT_SCORE_ATTESTATION_TYPE),
                required: Some(true),
            }],
            constraints: Some(Constraints {
                fields,
                statuses: Some(revoked_disallowed()),
            }),
        }],
        format: Some(jwt_format_designations()),
    }
}

/// Holder side: map each input descriptor onto the corresponding slot of the
/// presentation's credential array.
pub fn build_presentation_submission(
    definition: &PresentationDefinition,
) -> PresentationSubmission {
    PresentationSubmission {
        id: Uuid::new_v4().to_string(),
        definition_id: definition.id.clone(),
        descriptor_map: definition
            .input_descriptors
            .iter()
            .enumerate()
            .map(|(index, descriptor)| DescriptorMapEntry {
                id: descriptor.id.clone(),
                format: "jwt_vc".to_string(),
                path: format!("$.presentation.verifiableCredential[{index}]"),
            })
            .collect(),
    }
}

fn trusted_issuer_field(trusted_issuers: &[DidValue]) -> Option<ConstraintField> {
    if trusted_issuers.is_empty() {
        return None;
    }

    let pattern = trusted_issuers
        .iter()
        .map(|did| regex::escape(did.as_str()))
        .collect::<Vec<_>>()
        .join("|");

    Some(ConstraintField {
        path: vec![
            "$.issuer".to_string(),
            "$.issuer.id".to_string(),
            "$.vc.issuer".to_string(),
            "$.iss".to_string(),
        ],
        purpose: Some(TRUSTED_ISSUER_PURPOSE.to_string()),
        predicate: None,
        filter: Some(ConstraintFilter {
            r#type: Some(FilterType::String),
            pattern: Some(pattern),
            minimum: None,
        }),
    })
}

fn attestation_field_paths(attestation_type: &str, field: &str) -> Vec<String> {
    vec![
        format!("$.credentialSubject.{attestation_type}.{field}"),
        format!("$.vc.credentialSubject.{attestation_type}.{field}"),
        format!("$.{attestation_type}.{field}"),
    ]
}

fn revoked_disallowed() -> ConstraintStatuses {
    ConstraintStatuses {
        active: Some(StatusConstraint {
            directive: StatusDirective::Required,
        }),
        suspended: None,
        revoked: Some(StatusConstraint {
            directive: StatusDirective::Disallowed,
        }),
    }
}
