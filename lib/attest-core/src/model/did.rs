use attest_crypto::Signer;
use attest_crypto::signer::eddsa::EDDSASigner;
use secrecy::{ExposeSecret, SecretSlice};
use shared_types::DidValue;

use crate::provider::credential_formatter::jwt::AuthenticationFn;

/// A resolvable identifier together with the key material controlling it.
pub struct DidKey {
    pub did: DidValue,
    pub public_key: Vec<u8>,
    pub private_key: SecretSlice<u8>,
    pub algorithm: KeyAlgorithmType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAlgorithmType {
    Eddsa,
}

impl KeyAlgorithmType {
    pub fn jose_alg(&self) -> &'static str {
        match self {
            KeyAlgorithmType::Eddsa => "EdDSA",
        }
    }
}

impl DidKey {
    pub fn key_id(&self) -> String {
        match self.did.as_str().rsplit_once(':') {
            Some((_, fragment)) => format!("{}#{fragment}", self.did),
            None => self.did.to_string(),
        }
    }

    /// A one-shot signing closure over this key, for handing to the token
    /// codec without moving the key itself.
    pub fn auth_fn(&self) -> AuthenticationFn {
        let public_key = self.public_key.clone();
        let private_key: SecretSlice<u8> = self.private_key.expose_secret().to_vec().into();

        Box::new(move |message: &str| {
            EDDSASigner {}.sign(message.as_bytes(), &public_key, &private_key)
        })
    }
}

// manual impl, SecretSlice does not expose one
impl Clone for DidKey {
    fn clone(&self) -> Self {
        Self {
            did: self.did.clone(),
            public_key: self.public_key.clone(),
            private_key: self.private_key.expose_secret().to_vec().into(),
            algorithm: self.algorithm,
        }
    }
}

impl std::fmt::Debug for DidKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DidKey")
            .field("did", &self.did)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
