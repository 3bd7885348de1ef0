use std::sync::Arc;

use attest_crypto::Signer;
use shared_types::DidValue;
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{
    CredentialApplicationDescriptor, CredentialFulfillmentDescriptor, DecodedCredentialApplication,
    EncodedCredentialApplication, EncodedCredentialFulfillment, FulfillmentOptions,
};
use super::ManifestRegistry;
use crate::model::attestation::{ATTESTATION_VOCAB_CONTEXT, Attestation};
use crate::model::credential::{
    CredentialSubject, VERIFIABLE_CREDENTIAL_TYPE, VERIFIABLE_PRESENTATION_TYPE,
    VerifiableCredential, VerifiablePresentation, W3C_CREDENTIALS_CONTEXT,
};
use crate::model::did::DidKey;
use crate::model::manifest::CredentialManifest;
use crate::model::presentation_definition::{
    ClaimFormatDesignations, DescriptorMapEntry, JwtAlgorithms, PresentationSubmission,
};
use crate::provider::credential_formatter::jwt_formatter::JWTFormatter;
use crate::provider::did_method::DidMethodProvider;
use crate::service::error::{BusinessLogicError, ServiceError};
use crate::util::key_verification::KeyVerification;

/// Issuance protocol: manifest discovery, holder applications and issuer
/// fulfillments.
pub struct IssuanceService {
    formatter: Arc<JWTFormatter>,
    did_method_provider: Arc<dyn DidMethodProvider>,
    signer: Arc<dyn Signer>,
    registry: ManifestRegistry,
}

impl IssuanceService {
    pub fn new(
        formatter: Arc<JWTFormatter>,
        did_method_provider: Arc<dyn DidMethodProvider>,
        signer: Arc<dyn Signer>,
        registry: ManifestRegistry,
    ) -> Self {
        Self {
            formatter,
            did_method_provider,
            signer,
            registry,
        }
    }

    pub fn registry(&self) -> &ManifestRegistry {
        &self.registry
    }

    /// Holder side: answer a manifest with a signed, empty presentation
    /// proving control of the applicant's identifier.
    pub fn build_application(
        &self,
        holder: &DidKey,
        manifest: &CredentialManifest,
    ) -> Result<EncodedCredentialApplication, ServiceError> {
        let presentation = VerifiablePresentation {
            context: vec![W3C_CREDENTIALS_CONTEXT.to_string()],
            r#type: vec![VERIFIABLE_PRESENTATION_TYPE.to_string()],
            holder: holder.did.clone(),
            verifiable_credential: vec![],
        };
        let token = self.formatter.format_presentation(presentation, holder)?;

        let descriptor_map = manifest
            .presentation_definition
            .input_descriptors
            .iter()
            .map(|descriptor| DescriptorMapEntry {
                id: descriptor.id.clone(),
                format: "jwt_vp".to_string(),
                path: "$.presentation".to_string(),
            })
            .collect();

        Ok(EncodedCredentialApplication {
            credential_application: CredentialApplicationDescriptor {
                id: Uuid::new_v4().to_string(),
                manifest_id: manifest.id.clone(),
                format: ClaimFormatDesignations {
                    jwt_vc: None,
                    jwt_vp: Some(JwtAlgorithms {
                        alg: vec![holder.algorithm.jose_alg().to_string()],
                    }),
                },
            },
            presentation_submission: Some(PresentationSubmission {
                id: Uuid::new_v4().to_string(),
                definition_id: manifest.presentation_definition.id.clone(),
                descriptor_map,
            }),
            presentation: token,
        })
    }

    /// Issuer side: check an application against the registry and verify the
    /// proof of control before anything is issued on its behalf.
    pub async fn validate_application(
        &self,
        application: &EncodedCredentialApplication,
    ) -> Result<DecodedCredentialApplication, ServiceError> {
        let manifest_id = &application.credential_application.manifest_id;
        let manifest = self
            .registry
            .get(manifest_id)
            .ok_or_else(|| BusinessLogicError::UnknownManifest(manifest_id.clone()))?;

        if let Some(submission) = &application.presentation_submission {
            if submission.definition_id != manifest.presentation_definition.id {
                return Err(ServiceError::ValidationError(format!(
                    "submission targets definition `{}`, manifest expects `{}`",
                    submission.definition_id, manifest.presentation_definition.id
                )));
            }
        }

        let presentation = self
            .formatter
            .extract_presentation(&application.presentation, self.key_verification())
            .await?;

        Ok(DecodedCredentialApplication {
            credential_application: application.credential_application.clone(),
            presentation_submission: application.presentation_submission.clone(),
            presentation,
        })
    }

    /// Signs an attestation credential for the given subject.
    pub fn build_and_sign_verifiable_credential(
        &self,
        issuer: &DidKey,
        subject: &DidValue,
        attestation: &Attestation,
        options: &FulfillmentOptions,
    ) -> Result<String, ServiceError> {
        let attestation_value = serde_json::to_value(attestation)
            .map_err(|e| ServiceError::MappingError(e.to_string()))?;

        let credential = VerifiableCredential {
            context: vec![
                W3C_CREDENTIALS_CONTEXT.to_string(),
                ATTESTATION_VOCAB_CONTEXT.to_string(),
            ],
            id: None,
            r#type: vec![
                VERIFIABLE_CREDENTIAL_TYPE.to_string(),
                attestation.type_tag().to_string(),
            ],
            issuer: issuer.did.clone(),
            issuance_date: OffsetDateTime::now_utc(),
            expiration_date: options.expiration_date,
            credential_subject: CredentialSubject {
                id: subject.clone(),
                claims: [(attestation.type_tag().to_string(), attestation_value)].into(),
            },
            credential_status: options.credential_status.clone(),
        };

        Ok(self.formatter.format_credential(credential, issuer)?)
    }

    /// Wraps a freshly issued credential in a fulfillment presentation
    /// addressed back to the applicant.
    pub fn build_fulfillment(
        &self,
        issuer: &DidKey,
        application: &DecodedCredentialApplication,
        attestation: &Attestation,
        options: &FulfillmentOptions,
    ) -> Result<EncodedCredentialFulfillment, ServiceError> {
        let manifest_id = &application.credential_application.manifest_id;
        if self.registry.get(manifest_id).is_none() {
            return Err(BusinessLogicError::UnknownManifest(manifest_id.clone()).into());
        }

        let credential_token = self.build_and_sign_verifiable_credential(
            issuer,
            &application.presentation.holder,
            attestation,
            options,
        )?;

        let presentation = VerifiablePresentation {
            context: vec![W3C_CREDENTIALS_CONTEXT.to_string()],
            r#type: vec![
                VERIFIABLE_PRESENTATION_TYPE.to_string(),
                "CredentialFulfillment".to_string(),
            ],
            holder: issuer.did.clone(),
            verifiable_credential: vec![credential_token],
        };
        let token = self.formatter.format_presentation(presentation, issuer)?;

        // each entry of the application's submission is answered by the
        // credential at the same position of the fulfillment presentation
        let descriptor_map = application
            .presentation_submission
            .as_ref()
            .map(|submission| {
                submission
                    .descriptor_map
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| DescriptorMapEntry {
                        id: entry.id.clone(),
                        format: "jwt_vc".to_string(),
                        path: format!("$.presentation.verifiableCredential[{index}]"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(EncodedCredentialFulfillment {
            credential_fulfillment: CredentialFulfillmentDescriptor {
                id: Uuid::new_v4().to_string(),
                manifest_id: manifest_id.clone(),
                descriptor_map,
            },
            presentation: token,
        })
    }

    fn key_verification(&self) -> KeyVerification {
        KeyVerification {
            did_method_provider: self.did_method_provider.clone(),
            signer: self.signer.clone(),
        }
    }
}
