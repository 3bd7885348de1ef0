use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatterError {
    #[error("Could not sign: `{0}`")]
    CouldNotSign(String),
    #[error("Could not verify: `{0}`")]
    CouldNotVerify(String),
    #[error("Could not format: `{0}`")]
    CouldNotFormat(String),
    #[error("Could not extract credentials: `{0}`")]
    CouldNotExtractCredentials(String),
    #[error("Credential expired")]
    CredentialExpired,
    #[error("Credential not yet valid")]
    CredentialNotYetValid,
    #[error("JSON mapping error: `{0}`")]
    JsonMapping(#[from] serde_json::Error),
}
