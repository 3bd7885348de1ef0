use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use shared_types::DidValue;
use time::OffsetDateTime;

pub const W3C_CREDENTIALS_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";
pub const STATUS_LIST_2021_CONTEXT: &str = "https://w3id.org/vc-status-list-2021/v1";

pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";
pub const VERIFIABLE_PRESENTATION_TYPE: &str = "VerifiablePresentation";

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub r#type: Vec<String>,
    pub issuer: DidValue,
    #[serde(with = "time::serde::rfc3339")]
    pub issuance_date: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expiration_date: Option<OffsetDateTime>,
    pub credential_subject: CredentialSubject,
    pub credential_status: Option<CredentialStatus>,
}

impl VerifiableCredential {
    pub fn is_expired(&self) -> bool {
        self.expiration_date
            .is_some_and(|expiration| expiration < OffsetDateTime::now_utc())
    }

    /// A credential without a complete status entry can never be revoked.
    pub fn is_revocable(&self) -> bool {
        self.credential_status
            .as_ref()
            .is_some_and(|status| !status.status_list_index.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CredentialSubject {
    pub id: DidValue,
    #[serde(flatten)]
    pub claims: HashMap<String, serde_json::Value>,
}

/// StatusList2021Entry pointing at one bit in a hosted status list credential.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    pub id: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub status_list_index: String,
    pub status_list_credential: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiablePresentation {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    #[serde(rename = "type")]
    pub r#type: Vec<String>,
    pub holder: DidValue,
    /// Credentials stay in their signed JWT form inside the presentation.
    #[serde(default)]
    pub verifiable_credential: Vec<String>,
}
