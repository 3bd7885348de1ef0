use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use shared_types::DidValue;
use thiserror::Error;

pub mod key;
pub mod provider;

pub use provider::{DidMethodProvider, DidMethodProviderImpl};

#[derive(Debug, Error)]
pub enum DidMethodError {
    #[error("Did method not supported: `{0}`")]
    NotSupported(String),
    #[error("Could not resolve did: `{0}`")]
    ResolutionError(String),
    #[error("Key algorithm not supported")]
    KeyAlgorithmNotSupported,
    #[error("Did mapping error: `{0}`")]
    MappingError(String),
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait DidMethod: Send + Sync {
    fn get_method(&self) -> String;

    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, DidMethodError>;
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    pub id: DidValue,
    pub verification_method: Vec<VerificationMethod>,
    pub assertion_method: Option<Vec<String>>,
    pub authentication: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub controller: DidValue,
    #[serde(with = "public_key_multibase")]
    pub public_key: Vec<u8>,
}

impl DidDocument {
    /// Key to check assertion signatures against, following the document's
    /// assertionMethod references.
    pub fn find_assertion_key(&self) -> Option<&[u8]> {
        let reference = self.assertion_method.as_ref()?.first()?;
        self.verification_method
            .iter()
            .find(|method| &method.id == reference)
            .map(|method| method.public_key.as_slice())
    }
}

/// Serializes raw key bytes as `publicKeyMultibase` (base58btc, `z` prefix).
mod public_key_multibase {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(key: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("z{}", bs58::encode(key).into_string()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let encoded = encoded
            .strip_prefix('z')
            .ok_or_else(|| D::Error::custom("unsupported multibase prefix"))?;
        bs58::decode(encoded)
            .into_vec()
            .map_err(D::Error::custom)
    }
}
