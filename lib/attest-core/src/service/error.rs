use shared_types::{ManifestId, VerificationRequestId};
use thiserror::Error;

use crate::provider::credential_formatter::error::FormatterError;
use crate::provider::did_method::DidMethodError;
use crate::provider::revocation::RevocationError;
use crate::repository::DataLayerError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: `{0}`")]
    ValidationError(String),
    #[error("Mapping error: `{0}`")]
    MappingError(String),
    #[error(transparent)]
    BusinessLogic(#[from] BusinessLogicError),
    #[error(transparent)]
    Formatter(#[from] FormatterError),
    #[error(transparent)]
    DidMethod(#[from] DidMethodError),
    #[error(transparent)]
    Revocation(#[from] RevocationError),
    #[error("Data layer error: `{0}`")]
    Repository(#[from] DataLayerError),
}

#[derive(Debug, Error)]
pub enum BusinessLogicError {
    #[error("Unknown credential manifest: `{0}`")]
    UnknownManifest(ManifestId),
    #[error("Verification request not found: `{0}`")]
    VerificationRequestNotFound(VerificationRequestId),
    #[error("Verification request already processed: `{0}`")]
    VerificationRequestAlreadyProcessed(VerificationRequestId),
}
