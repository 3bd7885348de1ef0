use std::collections::HashMap;

use attest_crypto::signer::eddsa::EDDSASigner;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::model::credential::CredentialSubject;
use crate::provider::credential_formatter::jwt_formatter;
use crate::provider::did_method::key::{KeyDidMethod, generate_did_key};
use crate::provider::did_method::{DidMethod, DidMethodProviderImpl};

fn engine(params: Params) -> StatusList2021 {
    let did_methods: HashMap<String, Arc<dyn DidMethod>> =
        HashMap::from([("key".to_string(), Arc::new(KeyDidMethod) as _)]);

    StatusList2021::new(
        Arc::new(JWTFormatter::new(jwt_formatter::Params::default())),
        Arc::new(DidMethodProviderImpl::new(did_methods)),
        Arc::new(EDDSASigner {}),
        params,
    )
}

fn revocable_credential(
    engine: &StatusList2021,
    issuer: &DidKey,
    list_url: &str,
    index: usize,
) -> VerifiableCredential {
    VerifiableCredential {
        context: vec![W3C_CREDENTIALS_CONTEXT.to_string()],
        id: None,
        r#type: vec![VERIFIABLE_CREDENTIAL_TYPE.to_string()],
        issuer: issuer.did.clone(),
        issuance_date: OffsetDateTime::now_utc(),
        expiration_date: None,
        credential_subject: CredentialSubject {
            id: issuer.did.clone(),
            claims: HashMap::new(),
        },
        credential_status: Some(engine.create_status_entry(list_url, index)),
    }
}

const LIST_URL: &str = "https://attest.dev/status/1";

#[tokio::test]
async fn test_revoke_and_unrevoke_roundtrip() {
    let engine = engine(Params::default());
    let issuer = generate_did_key();

    let list = engine
        .generate_revocation_list(&[], LIST_URL, &issuer, None)
        .await
        .unwrap();
    let credential = revocable_credential(&engine, &issuer, LIST_URL, 42);

    assert!(!engine.is_revoked(&credential, Some(&list)).await.unwrap());

    let list = engine.revoke(&credential, &list, &issuer).await.unwrap();
    assert!(engine.is_revoked(&credential, Some(&list)).await.unwrap());

    // revoking again changes nothing
    let list = engine.revoke(&credential, &list, &issuer).await.unwrap();
    assert!(engine.is_revoked(&credential, Some(&list)).await.unwrap());

    let list = engine.unrevoke(&credential, &list, &issuer).await.unwrap();
    assert!(!engine.is_revoked(&credential, Some(&list)).await.unwrap());
}

#[tokio::test]
async fn test_revoke_leaves_other_indices_untouched() {
    let engine = engine(Params::default());
    let issuer = generate_did_key();

    let list = engine
        .generate_revocation_list(&[7, 9], LIST_URL, &issuer, None)
        .await
        .unwrap();
    let credential = revocable_credential(&engine, &issuer, LIST_URL, 8);

    let list = engine.revoke(&credential, &list, &issuer).await.unwrap();

    let indices = expand_bitstring(list.encoded_list().unwrap()).unwrap();
    assert_eq!(indices, vec![7, 8, 9]);
}

#[tokio::test]
async fn test_credential_without_status_is_never_revoked() {
    let engine = engine(Params::default());
    let issuer = generate_did_key();

    let list = engine
        .generate_revocation_list(&[], LIST_URL, &issuer, None)
        .await
        .unwrap();

    let mut credential = revocable_credential(&engine, &issuer, LIST_URL, 1);
    credential.credential_status = None;

    assert!(!engine.is_revoked(&credential, Some(&list)).await.unwrap());
    assert!(!engine.is_revoked(&credential, None).await.unwrap());

    // revoke is a no-op instead of an error
    let updated = engine.revoke(&credential, &list, &issuer).await.unwrap();
    assert_eq!(updated, list);
}

#[tokio::test]
async fn test_is_revoked_rejects_index_beyond_list_size() {
    let engine = engine(Params::default());
    let issuer = generate_did_key();

    let list = engine
        .generate_revocation_list(&[], LIST_URL, &issuer, None)
        .await
        .unwrap();
    // the minimum-size list holds 131072 bits, this points past them
    let credential = revocable_credential(&engine, &issuer, LIST_URL, 9_000_000);

    let result = engine.is_revoked(&credential, Some(&list)).await;
    assert!(matches!(
        result,
        Err(RevocationError::Bitstring(
            BitstringError::IndexOutOfBounds { .. }
        ))
    ));
}

#[tokio::test]
async fn test_revoke_rejects_mismatched_status_list() {
    let engine = engine(Params::default());
    let issuer = generate_did_key();

    let list = engine
        .generate_revocation_list(&[], LIST_URL, &issuer, None)
        .await
        .unwrap();
    let credential =
        revocable_credential(&engine, &issuer, "https://attest.dev/status/2", 42);

    let result = engine.revoke(&credential, &list, &issuer).await;
    assert!(matches!(result, Err(RevocationError::ValidationError(_))));
}

#[tokio::test]
async fn test_is_revoked_fetches_hosted_list() {
    let server = MockServer::start().await;
    let engine = engine(Params::default());
    let issuer = generate_did_key();

    let list_url = format!("{}/status/1", server.uri());
    let list = engine
        .generate_revocation_list(&[5], &list_url, &issuer, None)
        .await
        .unwrap();

    let token = engine
        .formatter
        .format_credential(list.into_credential(), &issuer)
        .unwrap();
    Mock::given(method("GET"))
        .and(path("/status/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(token))
        .mount(&server)
        .await;

    let revoked = revocable_credential(&engine, &issuer, &list_url, 5);
    let active = revocable_credential(&engine, &issuer, &list_url, 6);

    assert!(engine.is_revoked(&revoked, None).await.unwrap());
    assert!(!engine.is_revoked(&active, None).await.unwrap());
}

#[tokio::test]
async fn test_unreachable_status_list_fails_open() {
    let server = MockServer::start().await;
    let engine = engine(Params::default());
    let issuer = generate_did_key();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let list_url = format!("{}/status/1", server.uri());
    let credential = revocable_credential(&engine, &issuer, &list_url, 3);

    assert!(!engine.is_revoked(&credential, None).await.unwrap());
}

#[tokio::test]
async fn test_unreachable_status_list_fails_closed_when_configured() {
    let server = MockServer::start().await;
    let engine = engine(Params {
        fail_open: false,
        ..Params::default()
    });
    let issuer = generate_did_key();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let list_url = format!("{}/status/1", server.uri());
    let credential = revocable_credential(&engine, &issuer, &list_url, 3);

    let result = engine.is_revoked(&credential, None).await;
    assert!(matches!(result, Err(RevocationError::Transport(_))));
}
