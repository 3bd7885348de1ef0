use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use time::OffsetDateTime;

pub const KYC_AML_ATTESTATION_TYPE: &str = "KYCAMLAttestation";
pub const CREDIT_SCORE_ATTESTATION_TYPE: &str = "CreditScoreAttestation";

/// Base URI under which the attestation schemas are published.
pub const ATTESTATION_SCHEMA_BASE: &str = "https://attest.dev/schemas/identity/1.0.0";

/// JSON-LD context naming the attestation vocabulary.
pub const ATTESTATION_VOCAB_CONTEXT: &str = "https://attest.dev/contexts/identity";

/// Claim payload placed under the credential subject, keyed by its type tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Attestation {
    #[serde(rename = "KYCAMLAttestation")]
    KycAml(KycAmlAttestation),
    #[serde(rename = "CreditScoreAttestation")]
    CreditScore(CreditScoreAttestation),
}

impl Attestation {
    pub fn type_tag(&self) -> &'static str {
        match self {
            Attestation::KycAml(_) => KYC_AML_ATTESTATION_TYPE,
            Attestation::CreditScore(_) => CREDIT_SCORE_ATTESTATION_TYPE,
        }
    }

    pub fn schema_uri(&self) -> String {
        attestation_schema_uri(self.type_tag())
    }
}

pub fn attestation_schema_uri(type_tag: &str) -> String {
    format!("{ATTESTATION_SCHEMA_BASE}/{type_tag}")
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycAmlAttestation {
    pub process: Option<String>,
    pub authority_id: String,
    pub authority_name: String,
    pub authority_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub approval_date: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditScoreAttestation {
    pub score: i64,
    pub score_type: String,
    pub provider: String,
}
