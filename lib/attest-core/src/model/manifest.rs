use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use shared_types::{DidValue, ManifestId};

use super::presentation_definition::PresentationDefinition;

pub const CREDENTIAL_MANIFEST_SPEC_VERSION: &str = "0.1.0";

/// Credential Manifest advertising what an issuer can issue and what proof
/// it expects in exchange.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CredentialManifest {
    pub id: ManifestId,
    pub version: String,
    pub issuer: ManifestIssuer,
    pub format: super::presentation_definition::ClaimFormatDesignations,
    pub output_descriptors: Vec<OutputDescriptor>,
    pub presentation_definition: PresentationDefinition,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManifestIssuer {
    pub id: DidValue,
    pub name: Option<String>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    pub id: String,
    pub schema: Vec<super::presentation_definition::SchemaReference>,
    pub name: Option<String>,
    pub description: Option<String>,
}
