use async_trait::async_trait;
use attest_crypto::SignerError;
use ct_codecs::{Base64UrlSafeNoPadding, Decoder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::FormatterError;
use mapper::{bin_to_b64url_string, string_to_b64url_string};
use model::{DecomposedToken, JWTHeader, JWTPayload};

pub mod mapper;
pub mod model;

/// One-shot signing closure over the message to be signed.
pub type AuthenticationFn = Box<dyn FnOnce(&str) -> Result<Vec<u8>, SignerError> + Send>;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify<'a>(
        &self,
        issuer_did_value: Option<String>,
        algorithm: &'a str,
        token: &'a [u8],
        signature: &'a [u8],
    ) -> Result<(), SignerError>;
}

pub struct Jwt<Custom> {
    pub header: JWTHeader,
    pub payload: JWTPayload<Custom>,
}

impl<Custom: Serialize + DeserializeOwned> Jwt<Custom> {
    pub fn new(
        signature_type: &str,
        algorithm: &str,
        key_id: Option<String>,
        payload: JWTPayload<Custom>,
    ) -> Self {
        let header = JWTHeader {
            algorithm: algorithm.to_owned(),
            key_id,
            r#type: Some(signature_type.to_owned()),
        };

        Self { header, payload }
    }

    /// Decomposes a compact token and verifies its signature before handing
    /// the payload back.
    pub async fn build_from_token(
        token: &str,
        verification: impl TokenVerifier,
    ) -> Result<Self, FormatterError> {
        let decomposed = Self::decompose_token(token)?;

        verification
            .verify(
                decomposed.payload.issuer.clone(),
                &decomposed.header.algorithm,
                decomposed.signed_payload.as_bytes(),
                &decomposed.signature,
            )
            .await
            .map_err(|e| FormatterError::CouldNotVerify(e.to_string()))?;

        Ok(Self {
            header: decomposed.header,
            payload: decomposed.payload,
        })
    }

    pub fn decompose_token(token: &str) -> Result<DecomposedToken<Custom>, FormatterError> {
        let mut parts = token.splitn(3, '.');

        let (Some(header_part), Some(payload_part), Some(signature_part)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(FormatterError::CouldNotExtractCredentials(
                "invalid compact serialization".to_string(),
            ));
        };

        let header_decoded = Base64UrlSafeNoPadding::decode_to_vec(header_part, None)
            .map_err(|e| FormatterError::CouldNotExtractCredentials(e.to_string()))?;
        let header: JWTHeader = serde_json::from_slice(&header_decoded)?;

        let payload_decoded = Base64UrlSafeNoPadding::decode_to_vec(payload_part, None)
            .map_err(|e| FormatterError::CouldNotExtractCredentials(e.to_string()))?;
        let payload: JWTPayload<Custom> = serde_json::from_slice(&payload_decoded)?;

        let signature = Base64UrlSafeNoPadding::decode_to_vec(signature_part, None)
            .map_err(|e| FormatterError::CouldNotExtractCredentials(e.to_string()))?;

        Ok(DecomposedToken {
            header,
            payload,
            signature,
            signed_payload: format!("{header_part}.{payload_part}"),
        })
    }

    pub fn tokenize(&self, auth_fn: Option<AuthenticationFn>) -> Result<String, FormatterError> {
        let header_json = serde_json::to_string(&self.header)?;
        let payload_json = serde_json::to_string(&self.payload)?;

        let mut token = format!(
            "{}.{}",
            string_to_b64url_string(&header_json)?,
            string_to_b64url_string(&payload_json)?,
        );

        if let Some(auth_fn) = auth_fn {
            let signature =
                auth_fn(&token).map_err(|e| FormatterError::CouldNotSign(e.to_string()))?;
            token.push('.');
            token.push_str(&bin_to_b64url_string(&signature)?);
        }

        Ok(token)
    }
}
