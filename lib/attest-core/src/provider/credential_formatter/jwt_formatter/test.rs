use std::collections::HashMap;
use std::sync::Arc;

use attest_crypto::signer::eddsa::EDDSASigner;
use time::{Duration, OffsetDateTime};

use super::*;
use crate::model::credential::{
    CredentialSubject, W3C_CREDENTIALS_CONTEXT,
};
use crate::provider::credential_formatter::jwt::model::JWTPayload;
use crate::provider::did_method::key::{KeyDidMethod, generate_did_key};
use crate::provider::did_method::{DidMethod, DidMethodProviderImpl};
use crate::util::key_verification::KeyVerification;

fn key_verification() -> KeyVerification {
    let did_methods: HashMap<String, Arc<dyn DidMethod>> =
        HashMap::from([("key".to_string(), Arc::new(KeyDidMethod) as _)]);

    KeyVerification {
        did_method_provider: Arc::new(DidMethodProviderImpl::new(did_methods)),
        signer: Arc::new(EDDSASigner {}),
    }
}

fn test_credential(issuer: &DidKey, subject: &DidKey) -> VerifiableCredential {
    VerifiableCredential {
        context: vec![W3C_CREDENTIALS_CONTEXT.to_string()],
        id: None,
        r#type: vec![VERIFIABLE_CREDENTIAL_TYPE.to_string()],
        issuer: issuer.did.clone(),
        issuance_date: OffsetDateTime::now_utc(),
        expiration_date: Some(OffsetDateTime::now_utc() + Duration::days(30)),
        credential_subject: CredentialSubject {
            id: subject.did.clone(),
            claims: HashMap::from([(
                "KYCAMLAttestation".to_string(),
                serde_json::json!({ "authorityId": "did:web:attest.dev" }),
            )]),
        },
        credential_status: None,
    }
}

#[tokio::test]
async fn test_credential_roundtrip() {
    let issuer = generate_did_key();
    let subject = generate_did_key();
    let formatter = JWTFormatter::new(Params::default());

    let credential = test_credential(&issuer, &subject);
    let token = formatter
        .format_credential(credential.clone(), &issuer)
        .unwrap();

    let extracted = formatter
        .extract_credential(&token, key_verification())
        .await
        .unwrap();

    assert_eq!(extracted, credential);
}

#[tokio::test]
async fn test_format_credential_rejects_foreign_issuer() {
    let issuer = generate_did_key();
    let other = generate_did_key();
    let formatter = JWTFormatter::new(Params::default());

    let credential = test_credential(&issuer, &other);
    let result = formatter.format_credential(credential, &other);
    assert!(matches!(result, Err(FormatterError::CouldNotFormat(_))));
}

#[tokio::test]
async fn test_extract_credential_fails_on_tampered_token() {
    let issuer = generate_did_key();
    let subject = generate_did_key();
    let formatter = JWTFormatter::new(Params::default());

    let token = formatter
        .format_credential(test_credential(&issuer, &subject), &issuer)
        .unwrap();

    let mut parts: Vec<&str> = token.split('.').collect();
    let other_token = formatter
        .format_credential(test_credential(&issuer, &issuer), &issuer)
        .unwrap();
    let other_payload = other_token.split('.').nth(1).unwrap().to_string();
    parts[1] = &other_payload;
    let tampered = parts.join(".");

    let result = formatter
        .extract_credential(&tampered, key_verification())
        .await;
    assert!(matches!(result, Err(FormatterError::CouldNotVerify(_))));
}

#[tokio::test]
async fn test_extract_credential_fails_when_expired() {
    let issuer = generate_did_key();
    let subject = generate_did_key();
    let formatter = JWTFormatter::new(Params::default());

    let mut credential = test_credential(&issuer, &subject);
    credential.issuance_date = OffsetDateTime::now_utc() - Duration::days(2);
    credential.expiration_date = Some(OffsetDateTime::now_utc() - Duration::days(1));

    let token = formatter.format_credential(credential, &issuer).unwrap();
    let result = formatter.extract_credential(&token, key_verification()).await;
    assert!(matches!(result, Err(FormatterError::CredentialExpired)));
}

#[tokio::test]
async fn test_presentation_roundtrip() {
    let issuer = generate_did_key();
    let holder = generate_did_key();
    let formatter = JWTFormatter::new(Params::default());

    let credential_token = formatter
        .format_credential(test_credential(&issuer, &holder), &issuer)
        .unwrap();

    let presentation = VerifiablePresentation {
        context: vec![W3C_CREDENTIALS_CONTEXT.to_string()],
        r#type: vec![VERIFIABLE_PRESENTATION_TYPE.to_string()],
        holder: holder.did.clone(),
        verifiable_credential: vec![credential_token],
    };

    let token = formatter
        .format_presentation(presentation.clone(), &holder)
        .unwrap();
    let extracted = formatter
        .extract_presentation(&token, key_verification())
        .await
        .unwrap();

    assert_eq!(extracted, presentation);
}

#[tokio::test]
async fn test_extract_presentation_rejects_holder_not_matching_signer() {
    let holder = generate_did_key();
    let impostor = generate_did_key();
    let formatter = JWTFormatter::new(Params::default());

    // A presentation claiming somebody else's identifier, signed by the impostor.
    let presentation = VerifiablePresentation {
        context: vec![W3C_CREDENTIALS_CONTEXT.to_string()],
        r#type: vec![VERIFIABLE_PRESENTATION_TYPE.to_string()],
        holder: holder.did.clone(),
        verifiable_credential: vec![],
    };

    let now = OffsetDateTime::now_utc();
    let payload = JWTPayload {
        issued_at: Some(now),
        expires_at: None,
        invalid_before: Some(now),
        issuer: Some(impostor.did.to_string()),
        subject: None,
        audience: None,
        jwt_id: None,
        custom: model::VpClaim { vp: presentation },
    };
    let token = Jwt::new("JWT", "EdDSA", Some(impostor.key_id()), payload)
        .tokenize(Some(impostor.auth_fn()))
        .unwrap();

    let result = formatter.extract_presentation(&token, key_verification()).await;
    assert!(matches!(result, Err(FormatterError::CouldNotVerify(_))));
}

#[tokio::test]
async fn test_extract_presentation_fails_when_expired() {
    let holder = generate_did_key();
    let formatter = JWTFormatter::new(Params::default());

    let presentation = VerifiablePresentation {
        context: vec![W3C_CREDENTIALS_CONTEXT.to_string()],
        r#type: vec![VERIFIABLE_PRESENTATION_TYPE.to_string()],
        holder: holder.did.clone(),
        verifiable_credential: vec![],
    };

    let payload = JWTPayload {
        issued_at: Some(OffsetDateTime::now_utc() - Duration::hours(2)),
        expires_at: Some(OffsetDateTime::now_utc() - Duration::hours(1)),
        invalid_before: Some(OffsetDateTime::now_utc() - Duration::hours(2)),
        issuer: Some(holder.did.to_string()),
        subject: None,
        audience: None,
        jwt_id: None,
        custom: model::VpClaim { vp: presentation },
    };
    let token = Jwt::new("JWT", "EdDSA", Some(holder.key_id()), payload)
        .tokenize(Some(holder.auth_fn()))
        .unwrap();

    let result = formatter.extract_presentation(&token, key_verification()).await;
    assert!(matches!(result, Err(FormatterError::CredentialExpired)));
}
