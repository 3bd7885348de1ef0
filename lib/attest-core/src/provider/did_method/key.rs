use async_trait::async_trait;
use attest_crypto::signer::eddsa::EDDSASigner;
use shared_types::DidValue;

use super::{DidDocument, DidMethod, DidMethodError, VerificationMethod};
use crate::model::did::{DidKey, KeyAlgorithmType};

/// Multicodec prefix for an Ed25519 public key.
const MULTICODEC_ED25519: [u8; 2] = [0xed, 0x01];

pub struct KeyDidMethod;

/// Generates a fresh Ed25519 key pair and derives its `did:key` identifier.
pub fn generate_did_key() -> DidKey {
    let key_pair = EDDSASigner::generate_key_pair();
    let did = did_from_public_key(&key_pair.public);

    DidKey {
        did,
        public_key: key_pair.public,
        private_key: key_pair.private,
        algorithm: KeyAlgorithmType::Eddsa,
    }
}

pub(crate) fn did_from_public_key(public_key: &[u8]) -> DidValue {
    let mut codec_and_key = Vec::with_capacity(MULTICODEC_ED25519.len() + public_key.len());
    codec_and_key.extend_from_slice(&MULTICODEC_ED25519);
    codec_and_key.extend_from_slice(public_key);

    DidValue::from(format!(
        "did:key:z{}",
        bs58::encode(codec_and_key).into_string()
    ))
}

#[async_trait]
impl DidMethod for KeyDidMethod {
    fn get_method(&self) -> String {
        "key".to_string()
    }

    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, DidMethodError> {
        let tail = did
            .as_str()
            .strip_prefix("did:key:")
            .ok_or_else(|| DidMethodError::ResolutionError("invalid did:key prefix".to_string()))?;

        let encoded = tail.strip_prefix('z').ok_or_else(|| {
            DidMethodError::ResolutionError("unsupported multibase encoding".to_string())
        })?;

        let codec_and_key = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| DidMethodError::ResolutionError(format!("invalid base58: {e}")))?;

        let raw_key = codec_and_key
            .strip_prefix(&MULTICODEC_ED25519[..])
            .ok_or(DidMethodError::KeyAlgorithmNotSupported)?;

        let public_key = EDDSASigner::check_public_key(raw_key)
            .map_err(|e| DidMethodError::ResolutionError(e.to_string()))?;

        let method_id = format!("{did}#z{encoded}");
        Ok(DidDocument {
            id: did.clone(),
            verification_method: vec![VerificationMethod {
                id: method_id.clone(),
                r#type: "Ed25519VerificationKey2020".to_string(),
                controller: did.clone(),
                public_key,
            }],
            assertion_method: Some(vec![method_id.clone()]),
            authentication: Some(vec![method_id]),
        })
    }
}
