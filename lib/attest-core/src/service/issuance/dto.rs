use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use shared_types::ManifestId;
use time::OffsetDateTime;

use crate::model::credential::{CredentialStatus, VerifiablePresentation};
use crate::model::presentation_definition::{
    ClaimFormatDesignations, DescriptorMapEntry, PresentationSubmission,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CredentialApplicationDescriptor {
    pub id: String,
    pub manifest_id: ManifestId,
    pub format: ClaimFormatDesignations,
}

/// Holder-signed application as it travels over the wire. The presentation
/// is an empty, signed proof of control over the applicant's identifier.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncodedCredentialApplication {
    pub credential_application: CredentialApplicationDescriptor,
    pub presentation_submission: Option<PresentationSubmission>,
    pub presentation: String,
}

#[derive(Clone, Debug)]
pub struct DecodedCredentialApplication {
    pub credential_application: CredentialApplicationDescriptor,
    pub presentation_submission: Option<PresentationSubmission>,
    pub presentation: VerifiablePresentation,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CredentialFulfillmentDescriptor {
    pub id: String,
    pub manifest_id: ManifestId,
    pub descriptor_map: Vec<DescriptorMapEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncodedCredentialFulfillment {
    pub credential_fulfillment: CredentialFulfillmentDescriptor,
    pub presentation: String,
}

/// Issuer-side knobs for the credential being issued.
#[derive(Debug, Default)]
pub struct FulfillmentOptions {
    pub credential_status: Option<CredentialStatus>,
    pub expiration_date: Option<OffsetDateTime>,
}
