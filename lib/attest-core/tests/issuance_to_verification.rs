use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use attest_core::AttestCore;
use attest_core::config::CoreConfig;
use attest_core::model::attestation::{Attestation, KycAmlAttestation};
use attest_core::model::credential::{
    VERIFIABLE_PRESENTATION_TYPE, VerifiablePresentation, W3C_CREDENTIALS_CONTEXT,
};
use attest_core::model::verification_request::{
    ValidationFailure, VerificationRequest, VerificationStatus,
};
use attest_core::provider::did_method::key::generate_did_key;
use attest_core::repository::{DataLayerError, VerificationRequestRepository};
use attest_core::service::issuance::dto::FulfillmentOptions;
use attest_core::service::issuance::mapper::kyc_aml_manifest;
use attest_core::service::issuance::ManifestRegistry;
use attest_core::service::verification::dto::EncodedVerificationSubmission;
use attest_core::service::verification::mapper::{
    build_presentation_submission, kyc_presentation_definition,
};
use attest_core::model::manifest::ManifestIssuer;
use shared_types::VerificationRequestId;
use time::OffsetDateTime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct InMemoryRequests(Mutex<HashMap<VerificationRequestId, VerificationRequest>>);

#[async_trait]
impl VerificationRequestRepository for InMemoryRequests {
    async fn create(&self, request: VerificationRequest) -> Result<(), DataLayerError> {
        self.0.lock().unwrap().insert(request.id, request);
        Ok(())
    }

    async fn get(
        &self,
        id: &VerificationRequestId,
    ) -> Result<Option<VerificationRequest>, DataLayerError> {
        Ok(self.0.lock().unwrap().get(id).cloned())
    }

    async fn update_status(
        &self,
        id: &VerificationRequestId,
        status: VerificationStatus,
        failures: Vec<ValidationFailure>,
    ) -> Result<(), DataLayerError> {
        let mut requests = self.0.lock().unwrap();
        let request = requests.get_mut(id).ok_or(DataLayerError::RecordNotUpdated)?;
        request.status = status;
        request.failures = failures;
        request.last_modified = OffsetDateTime::now_utc();
        Ok(())
    }
}

fn core(issuer_did: &shared_types::DidValue) -> AttestCore {
    let registry = ManifestRegistry::new(vec![kyc_aml_manifest(ManifestIssuer {
        id: issuer_did.clone(),
        name: Some("Attest".to_string()),
    })]);

    AttestCore::new(
        CoreConfig::default(),
        registry,
        Arc::new(InMemoryRequests::default()),
    )
}

#[tokio::test]
async fn test_full_issuance_and_verification_flow() {
    let issuer = generate_did_key();
    let holder = generate_did_key();
    let core = core(&issuer.did);

    // holder applies for the advertised manifest
    let manifest = core
        .issuance_service
        .registry()
        .get(&"KYCAMLAttestation".into())
        .unwrap()
        .clone();
    let application = core
        .issuance_service
        .build_application(&holder, &manifest)
        .unwrap();

    // issuer validates the application and issues a fulfillment
    let decoded = core
        .issuance_service
        .validate_application(&application)
        .await
        .unwrap();
    let attestation = Attestation::KycAml(KycAmlAttestation {
        process: None,
        authority_id: "did:web:attest.dev".to_string(),
        authority_name: "Attest".to_string(),
        authority_url: None,
        approval_date: OffsetDateTime::now_utc(),
    });
    let fulfillment = core
        .issuance_service
        .build_fulfillment(&issuer, &decoded, &attestation, &FulfillmentOptions::default())
        .unwrap();

    // holder unwraps the credential from the fulfillment presentation
    let fulfillment_presentation = core
        .formatter
        .extract_presentation(
            &fulfillment.presentation,
            attest_core::util::key_verification::KeyVerification {
                did_method_provider: core.did_method_provider.clone(),
                signer: Arc::new(attest_crypto::signer::eddsa::EDDSASigner {}),
            },
        )
        .await
        .unwrap();
    let credential_token = fulfillment_presentation.verifiable_credential[0].clone();

    // verifier opens a request trusting this issuer
    let definition = kyc_presentation_definition(std::slice::from_ref(&issuer.did));
    let request = core
        .verification_service
        .create_request(definition.clone())
        .await
        .unwrap();

    // holder presents the credential back
    let presentation = VerifiablePresentation {
        context: vec![W3C_CREDENTIALS_CONTEXT.to_string()],
        r#type: vec![VERIFIABLE_PRESENTATION_TYPE.to_string()],
        holder: holder.did.clone(),
        verifiable_credential: vec![credential_token],
    };
    let presentation_token = core
        .formatter
        .format_presentation(presentation, &holder)
        .unwrap();
    let submission = EncodedVerificationSubmission {
        presentation_submission: Some(build_presentation_submission(&definition)),
        presentation: presentation_token,
    };

    let processed = core
        .verification_service
        .submit(&request.id, &submission)
        .await
        .unwrap();
    assert!(processed.accepted, "failures: {:?}", processed.failures);

    let stored = core
        .verification_service
        .get_request(&request.id)
        .await
        .unwrap();
    assert_eq!(stored.status, VerificationStatus::Approved);
}

#[tokio::test]
async fn test_revocation_round_trip_through_hosted_list() {
    let server = MockServer::start().await;
    let issuer = generate_did_key();
    let holder = generate_did_key();
    let core = core(&issuer.did);

    let list_url = format!("{}/status/1", server.uri());
    let list = core
        .revocation
        .generate_revocation_list(&[], &list_url, &issuer, None)
        .await
        .unwrap();

    // issue a revocable credential occupying index 7
    let status = core.revocation.create_status_entry(&list_url, 7);
    let attestation = Attestation::KycAml(KycAmlAttestation {
        process: None,
        authority_id: "did:web:attest.dev".to_string(),
        authority_name: "Attest".to_string(),
        authority_url: None,
        approval_date: OffsetDateTime::now_utc(),
    });
    let options = FulfillmentOptions {
        credential_status: Some(status),
        expiration_date: None,
    };
    let credential_token = core
        .issuance_service
        .build_and_sign_verifiable_credential(&issuer, &holder.did, &attestation, &options)
        .unwrap();

    let credential = {
        let key_verification = attest_core::util::key_verification::KeyVerification {
            did_method_provider: core.did_method_provider.clone(),
            signer: Arc::new(attest_crypto::signer::eddsa::EDDSASigner {}),
        };
        core.formatter
            .extract_credential(&credential_token, key_verification)
            .await
            .unwrap()
    };

    // not revoked against the fresh list
    assert!(!core
        .revocation
        .is_revoked(&credential, Some(&list))
        .await
        .unwrap());

    // revoke it and host the updated list
    let list = core
        .revocation
        .revoke(&credential, &list, &issuer)
        .await
        .unwrap();
    assert!(core
        .revocation
        .is_revoked(&credential, Some(&list))
        .await
        .unwrap());

    let list_token = core
        .formatter
        .format_credential(list.into_credential(), &issuer)
        .unwrap();
    Mock::given(method("GET"))
        .and(path("/status/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(list_token))
        .mount(&server)
        .await;

    // a fetch-backed check sees the revocation too
    assert!(core.revocation.is_revoked(&credential, None).await.unwrap());
}
