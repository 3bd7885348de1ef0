use thiserror::Error;

pub mod verification_request_repository;

pub use verification_request_repository::VerificationRequestRepository;

#[derive(Debug, Error)]
pub enum DataLayerError {
    #[error("Record not updated")]
    RecordNotUpdated,
    #[error("Database error: `{0}`")]
    Db(#[from] anyhow::Error),
}
