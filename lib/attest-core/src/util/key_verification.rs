use std::sync::Arc;

use async_trait::async_trait;
use attest_crypto::{Signer, SignerError};
use shared_types::DidValue;

use crate::provider::credential_formatter::jwt::TokenVerifier;
use crate::provider::did_method::DidMethodProvider;

/// Verifies token signatures by resolving the issuer identifier to its DID
/// document and checking against the assertion key found there.
#[derive(Clone)]
pub struct KeyVerification {
    pub did_method_provider: Arc<dyn DidMethodProvider>,
    pub signer: Arc<dyn Signer>,
}

#[async_trait]
impl TokenVerifier for KeyVerification {
    async fn verify<'a>(
        &self,
        issuer_did_value: Option<String>,
        algorithm: &'a str,
        token: &'a [u8],
        signature: &'a [u8],
    ) -> Result<(), SignerError> {
        if algorithm != "EdDSA" {
            return Err(SignerError::MissingAlgorithm(algorithm.to_owned()));
        }

        let issuer = issuer_did_value.ok_or(SignerError::MissingKey)?;
        let did = DidValue::from(issuer);

        let document = self
            .did_method_provider
            .resolve(&did)
            .await
            .map_err(|e| SignerError::CouldNotVerify(e.to_string()))?;

        let public_key = document
            .find_assertion_key()
            .ok_or(SignerError::MissingKey)?;

        self.signer.verify(token, signature, public_key)
    }
}
