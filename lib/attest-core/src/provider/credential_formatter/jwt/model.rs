use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use time::OffsetDateTime;

use super::mapper::unix_timestamp_option;

#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct JWTHeader {
    #[serde(rename = "alg")]
    pub algorithm: String,
    #[serde(rename = "kid")]
    pub key_id: Option<String>,
    #[serde(rename = "typ")]
    pub r#type: Option<String>,
}

/// Registered claims as unix seconds, with the domain payload flattened in.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JWTPayload<Custom> {
    #[serde(default, rename = "iat", with = "unix_timestamp_option")]
    pub issued_at: Option<OffsetDateTime>,

    #[serde(default, rename = "exp", with = "unix_timestamp_option")]
    pub expires_at: Option<OffsetDateTime>,

    #[serde(default, rename = "nbf", with = "unix_timestamp_option")]
    pub invalid_before: Option<OffsetDateTime>,

    #[serde(rename = "iss")]
    pub issuer: Option<String>,

    #[serde(rename = "sub")]
    pub subject: Option<String>,

    #[serde(rename = "aud")]
    pub audience: Option<String>,

    #[serde(rename = "jti")]
    pub jwt_id: Option<String>,

    #[serde(flatten)]
    pub custom: Custom,
}

pub struct DecomposedToken<Custom> {
    pub header: JWTHeader,
    pub payload: JWTPayload<Custom>,
    pub signature: Vec<u8>,
    /// The exact `<header>.<payload>` bytes the signature covers.
    pub signed_payload: String,
}
