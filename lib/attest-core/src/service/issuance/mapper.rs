use shared_types::ManifestId;

use crate::model::attestation::{
    CREDIT_SCORE_ATTESTATION_TYPE, KYC_AML_ATTESTATION_TYPE, attestation_schema_uri,
};
use crate::model::manifest::{
    CREDENTIAL_MANIFEST_SPEC_VERSION, CredentialManifest, ManifestIssuer, OutputDescriptor,
};
use crate::model::presentation_definition::{
    ClaimFormatDesignations, InputDescriptor, JwtAlgorithms, PresentationDefinition,
    PROOF_OF_CONTROL_PRESENTATION_DEFINITION_ID, SchemaReference,
};

pub(crate) fn jwt_format_designations() -> ClaimFormatDesignations {
    ClaimFormatDesignations {
        jwt_vc: Some(JwtAlgorithms {
            alg: vec!["EdDSA".to_string()],
        }),
        jwt_vp: Some(JwtAlgorithms {
            alg: vec!["EdDSA".to_string()],
        }),
    }
}

/// The definition every application must answer: present an empty signed
/// presentation proving control over the applicant's identifier.
pub fn proof_of_control_presentation_definition() -> PresentationDefinition {
    PresentationDefinition {
        id: PROOF_OF_CONTROL_PRESENTATION_DEFINITION_ID.to_string(),
        input_descriptors: vec![InputDescriptor {
            id: "proofOfIdentifierControlVP".to_string(),
            name: Some("Proof of Identifier Control VP".to_string()),
            purpose: Some(
                "A Verifiable Presentation proving control of the credential subject identifier"
                    .to_string(),
            ),
            schema: vec![SchemaReference {
                uri: "/.well-known/verifiablePresentationSchema.json".to_string(),
                required: None,
            }],
            constraints: None,
        }],
        format: Some(jwt_format_designations()),
    }
}

pub fn build_manifest(
    id: ManifestId,
    issuer: ManifestIssuer,
    attestation_type: &str,
    output_name: &str,
    output_description: &str,
) -> CredentialManifest {
    CredentialManifest {
        id,
        version: CREDENTIAL_MANIFEST_SPEC_VERSION.to_string(),
        issuer,
        format: jwt_format_designations(),
        output_descriptors: vec![OutputDescriptor {
            id: attestation_type.to_string(),
            schema: vec![SchemaReference {
                uri: attestation_schema_uri(attestation_type),
                required: None,
            }],
            name: Some(output_name.to_string()),
            description: Some(output_description.to_string()),
        }],
        presentation_definition: proof_of_control_presentation_definition(),
    }
}

pub fn kyc_aml_manifest(issuer: ManifestIssuer) -> CredentialManifest {
    let name = format!(
        "Proof of KYC from {}",
        issuer.name.as_deref().unwrap_or("issuer")
    );
    build_manifest(
        KYC_AML_ATTESTATION_TYPE.into(),
        issuer,
        KYC_AML_ATTESTATION_TYPE,
        &name,
        "Attestation that the subject has completed a KYC/AML check",
    )
}

pub fn credit_score_manifest(issuer: ManifestIssuer) -> CredentialManifest {
    let name = format!(
        "Credit Score from {}",
        issuer.name.as_deref().unwrap_or("issuer")
    );
    build_manifest(
        CREDIT_SCORE_ATTESTATION_TYPE.into(),
        issuer,
        CREDIT_SCORE_ATTESTATION_TYPE,
        &name,
        "Attestation of the subject's credit score at issuance time",
    )
}
