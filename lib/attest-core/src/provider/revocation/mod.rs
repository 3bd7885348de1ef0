use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use attest_crypto::Signer;
use serde::Deserialize;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::credential::{
    CredentialStatus, CredentialSubject, STATUS_LIST_2021_CONTEXT, VERIFIABLE_CREDENTIAL_TYPE,
    VerifiableCredential, W3C_CREDENTIALS_CONTEXT,
};
use crate::model::did::DidKey;
use crate::provider::credential_formatter::error::FormatterError;
use crate::provider::credential_formatter::jwt_formatter::JWTFormatter;
use crate::provider::did_method::DidMethodProvider;
use crate::util::bitstring::{
    BitstringError, expand_bitstring, extract_bitstring_index, generate_bitstring,
};
use crate::util::key_verification::KeyVerification;
use model::{RevocationListCredential, STATUS_LIST_2021_CREDENTIAL, STATUS_LIST_2021_ENTRY};
use resolver::StatusListResolver;

pub mod model;
pub(crate) mod resolver;

#[cfg(test)]
mod test;

#[derive(Debug, Error)]
pub enum RevocationError {
    #[error("Status list transport error: `{0}`")]
    Transport(String),
    #[error("Status list validation error: `{0}`")]
    ValidationError(String),
    #[error(transparent)]
    Bitstring(#[from] BitstringError),
    #[error(transparent)]
    Formatter(#[from] FormatterError),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Params {
    /// When true, a status list that cannot be fetched is treated as not
    /// revoking anything instead of failing verification.
    pub fail_open: bool,
    pub fetch_timeout: Duration,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            fail_open: true,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// StatusList2021 revocation over gzip-compressed bitstrings hosted as
/// signed credentials.
pub struct StatusList2021 {
    formatter: Arc<JWTFormatter>,
    did_method_provider: Arc<dyn DidMethodProvider>,
    signer: Arc<dyn Signer>,
    resolver: StatusListResolver,
    params: Params,
}

impl StatusList2021 {
    pub fn new(
        formatter: Arc<JWTFormatter>,
        did_method_provider: Arc<dyn DidMethodProvider>,
        signer: Arc<dyn Signer>,
        params: Params,
    ) -> Self {
        let resolver = StatusListResolver::new(params.fetch_timeout);
        Self {
            formatter,
            did_method_provider,
            signer,
            resolver,
            params,
        }
    }

    /// Builds the status entry to embed into a credential occupying the
    /// given index of a hosted list.
    pub fn create_status_entry(&self, list_url: &str, index: usize) -> CredentialStatus {
        CredentialStatus {
            id: format!("{list_url}#{index}"),
            r#type: STATUS_LIST_2021_ENTRY.to_string(),
            status_list_index: index.to_string(),
            status_list_credential: list_url.to_string(),
        }
    }

    /// Issues a fresh status list credential with exactly the given indices
    /// revoked. The result is signed and immediately decoded back, so a list
    /// that would not survive verification is never handed out.
    pub async fn generate_revocation_list(
        &self,
        revoked_indices: &[usize],
        list_url: &str,
        issuer: &DidKey,
        issuance_date: Option<OffsetDateTime>,
    ) -> Result<RevocationListCredential, RevocationError> {
        let encoded_list = generate_bitstring(revoked_indices)?;

        let credential = VerifiableCredential {
            context: vec![
                W3C_CREDENTIALS_CONTEXT.to_string(),
                STATUS_LIST_2021_CONTEXT.to_string(),
            ],
            id: Some(list_url.to_string()),
            r#type: vec![
                VERIFIABLE_CREDENTIAL_TYPE.to_string(),
                STATUS_LIST_2021_CREDENTIAL.to_string(),
            ],
            issuer: issuer.did.clone(),
            issuance_date: issuance_date.unwrap_or_else(OffsetDateTime::now_utc),
            expiration_date: None,
            credential_subject: CredentialSubject {
                id: format!("{list_url}#list").into(),
                claims: [
                    (
                        "type".to_string(),
                        serde_json::json!(model::REVOCATION_LIST_2021_SUBJECT),
                    ),
                    ("encodedList".to_string(), serde_json::json!(encoded_list)),
                ]
                .into(),
            },
            credential_status: None,
        };

        let token = self.formatter.format_credential(credential, issuer)?;
        let decoded = self
            .formatter
            .extract_credential(&token, self.key_verification())
            .await?;

        decoded.try_into().map_err(RevocationError::ValidationError)
    }

    /// Marks the credential's status index as revoked. Revoking an already
    /// revoked index is a no-op, as is a credential without a status entry.
    pub async fn revoke(
        &self,
        credential: &VerifiableCredential,
        list: &RevocationListCredential,
        issuer: &DidKey,
    ) -> Result<RevocationListCredential, RevocationError> {
        self.update_list(credential, list, issuer, true).await
    }

    /// Clears the credential's status index.
    pub async fn unrevoke(
        &self,
        credential: &VerifiableCredential,
        list: &RevocationListCredential,
        issuer: &DidKey,
    ) -> Result<RevocationListCredential, RevocationError> {
        self.update_list(credential, list, issuer, false).await
    }

    async fn update_list(
        &self,
        credential: &VerifiableCredential,
        list: &RevocationListCredential,
        issuer: &DidKey,
        revoked: bool,
    ) -> Result<RevocationListCredential, RevocationError> {
        let Some(index) = status_list_index(credential)? else {
            return Ok(list.clone());
        };

        let encoded_list = list.encoded_list().ok_or_else(|| {
            RevocationError::ValidationError("status list without encodedList".to_string())
        })?;
        let list_url = list.list_url().ok_or_else(|| {
            RevocationError::ValidationError("status list without id".to_string())
        })?;

        // a status index only makes sense on the list its entry points at
        if let Some(status) = &credential.credential_status {
            if status.status_list_credential != list_url {
                return Err(RevocationError::ValidationError(format!(
                    "credential status targets list `{}`, not `{list_url}`",
                    status.status_list_credential
                )));
            }
        }

        let mut indices: BTreeSet<usize> = expand_bitstring(encoded_list)?.into_iter().collect();
        if revoked {
            indices.insert(index);
        } else {
            indices.remove(&index);
        }

        let indices: Vec<usize> = indices.into_iter().collect();
        self.generate_revocation_list(&indices, list_url, issuer, None)
            .await
    }

    /// Checks the credential against its status list. Without a status entry
    /// the credential can never be revoked. When no list is supplied it is
    /// fetched from the credential's `statusListCredential` URL; fetch
    /// failures follow the configured fail-open policy.
    pub async fn is_revoked(
        &self,
        credential: &VerifiableCredential,
        list: Option<&RevocationListCredential>,
    ) -> Result<bool, RevocationError> {
        let Some(index) = status_list_index(credential)? else {
            return Ok(false);
        };

        let fetched;
        let list = match list {
            Some(list) => list,
            None => {
                let status = credential
                    .credential_status
                    .as_ref()
                    .ok_or_else(|| {
                        RevocationError::ValidationError("missing credential status".to_string())
                    })?;
                match self.fetch_status_list(&status.status_list_credential).await? {
                    Some(list) => {
                        fetched = list;
                        &fetched
                    }
                    None => return Ok(false),
                }
            }
        };

        let encoded_list = list.encoded_list().ok_or_else(|| {
            RevocationError::ValidationError("status list without encodedList".to_string())
        })?;

        // only decompresses as far as the probed bit
        Ok(extract_bitstring_index(encoded_list, index)?)
    }

    /// Fetches and verifies a hosted status list. Returns `None` when the
    /// list is unreachable and the policy is fail-open.
    pub async fn fetch_status_list(
        &self,
        url: &str,
    ) -> Result<Option<RevocationListCredential>, RevocationError> {
        let token = match self.resolver.fetch(url).await {
            Ok(token) => token,
            Err(error) if self.params.fail_open => {
                tracing::warn!(%url, %error, "status list unreachable, failing open");
                return Ok(None);
            }
            Err(error) => return Err(error),
        };

        let credential = self
            .formatter
            .extract_credential(&token, self.key_verification())
            .await?;

        credential
            .try_into()
            .map(Some)
            .map_err(RevocationError::ValidationError)
    }

    fn key_verification(&self) -> KeyVerification {
        KeyVerification {
            did_method_provider: self.did_method_provider.clone(),
            signer: self.signer.clone(),
        }
    }
}

fn status_list_index(
    credential: &VerifiableCredential,
) -> Result<Option<usize>, RevocationError> {
    let Some(status) = &credential.credential_status else {
        return Ok(None);
    };
    if status.status_list_index.is_empty() {
        return Ok(None);
    }

    status
        .status_list_index
        .parse()
        .map(Some)
        .map_err(|_| {
            RevocationError::ValidationError(format!(
                "invalid status list index: {}",
                status.status_list_index
            ))
        })
}
