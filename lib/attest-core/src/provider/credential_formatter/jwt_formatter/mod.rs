use serde::Deserialize;
use time::{Duration, OffsetDateTime};

use super::error::FormatterError;
use super::jwt::model::JWTPayload;
use super::jwt::{Jwt, TokenVerifier};
use crate::model::credential::{
    VERIFIABLE_CREDENTIAL_TYPE, VERIFIABLE_PRESENTATION_TYPE, VerifiableCredential,
    VerifiablePresentation,
};
use crate::model::did::DidKey;
use model::{VcClaim, VpClaim};

pub mod model;

#[cfg(test)]
mod test;

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Clock drift tolerance in seconds for expiry and not-before checks.
    pub leeway: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self { leeway: 60 }
    }
}

/// Encodes and decodes credentials and presentations in the JWT compact
/// serialization. Decoding always verifies the signature and the temporal
/// claims; a token that fails either never yields a payload.
pub struct JWTFormatter {
    params: Params,
}

impl JWTFormatter {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn format_credential(
        &self,
        credential: VerifiableCredential,
        signer: &DidKey,
    ) -> Result<String, FormatterError> {
        if credential.issuer != signer.did {
            return Err(FormatterError::CouldNotFormat(
                "credential issuer does not match signing key".to_string(),
            ));
        }

        let payload = JWTPayload {
            issued_at: None,
            expires_at: credential.expiration_date,
            invalid_before: Some(credential.issuance_date),
            issuer: Some(credential.issuer.to_string()),
            subject: Some(credential.credential_subject.id.to_string()),
            audience: None,
            jwt_id: credential.id.clone(),
            custom: VcClaim { vc: credential },
        };

        let jwt = Jwt::new(
            "JWT",
            signer.algorithm.jose_alg(),
            Some(signer.key_id()),
            payload,
        );
        jwt.tokenize(Some(signer.auth_fn()))
    }

    pub async fn extract_credential(
        &self,
        token: &str,
        verification: impl TokenVerifier,
    ) -> Result<VerifiableCredential, FormatterError> {
        let jwt: Jwt<VcClaim> = Jwt::build_from_token(token, verification).await?;

        self.check_validity(
            jwt.payload.expires_at,
            jwt.payload.invalid_before,
        )?;

        let credential = jwt.payload.custom.vc;

        let issuer = jwt.payload.issuer.ok_or_else(|| {
            FormatterError::CouldNotExtractCredentials("missing iss claim".to_string())
        })?;
        if issuer != credential.issuer.as_str() {
            return Err(FormatterError::CouldNotVerify(
                "token issuer does not match credential issuer".to_string(),
            ));
        }

        if !credential
            .r#type
            .iter()
            .any(|credential_type| credential_type == VERIFIABLE_CREDENTIAL_TYPE)
        {
            return Err(FormatterError::CouldNotExtractCredentials(
                "missing VerifiableCredential type".to_string(),
            ));
        }

        self.check_validity(credential.expiration_date, None)?;

        Ok(credential)
    }

    pub fn format_presentation(
        &self,
        presentation: VerifiablePresentation,
        signer: &DidKey,
    ) -> Result<String, FormatterError> {
        if presentation.holder != signer.did {
            return Err(FormatterError::CouldNotFormat(
                "presentation holder does not match signing key".to_string(),
            ));
        }

        let now = OffsetDateTime::now_utc();
        let payload = JWTPayload {
            issued_at: Some(now),
            expires_at: None,
            invalid_before: Some(now),
            issuer: Some(presentation.holder.to_string()),
            subject: None,
            audience: None,
            jwt_id: None,
            custom: VpClaim { vp: presentation },
        };

        let jwt = Jwt::new(
            "JWT",
            signer.algorithm.jose_alg(),
            Some(signer.key_id()),
            payload,
        );
        jwt.tokenize(Some(signer.auth_fn()))
    }

    pub async fn extract_presentation(
        &self,
        token: &str,
        verification: impl TokenVerifier,
    ) -> Result<VerifiablePresentation, FormatterError> {
        let jwt: Jwt<VpClaim> = Jwt::build_from_token(token, verification).await?;

        self.check_validity(
            jwt.payload.expires_at,
            jwt.payload.invalid_before,
        )?;

        let presentation = jwt.payload.custom.vp;

        // The signature was checked against `iss`. A presentation claiming a
        // different holder would smuggle in an unproven identifier.
        let issuer = jwt.payload.issuer.ok_or_else(|| {
            FormatterError::CouldNotExtractCredentials("missing iss claim".to_string())
        })?;
        if issuer != presentation.holder.as_str() {
            return Err(FormatterError::CouldNotVerify(
                "token issuer does not match presentation holder".to_string(),
            ));
        }

        if !presentation
            .r#type
            .iter()
            .any(|presentation_type| presentation_type == VERIFIABLE_PRESENTATION_TYPE)
        {
            return Err(FormatterError::CouldNotExtractCredentials(
                "missing VerifiablePresentation type".to_string(),
            ));
        }

        Ok(presentation)
    }

    fn check_validity(
        &self,
        expires_at: Option<OffsetDateTime>,
        invalid_before: Option<OffsetDateTime>,
    ) -> Result<(), FormatterError> {
        let now = OffsetDateTime::now_utc();
        let leeway = Duration::seconds(self.params.leeway as i64);

        if let Some(expires_at) = expires_at {
            if now > expires_at + leeway {
                return Err(FormatterError::CredentialExpired);
            }
        }

        if let Some(invalid_before) = invalid_before {
            if now < invalid_before - leeway {
                return Err(FormatterError::CredentialNotYetValid);
            }
        }

        Ok(())
    }
}
