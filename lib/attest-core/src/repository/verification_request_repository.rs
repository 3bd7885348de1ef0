use async_trait::async_trait;
use shared_types::VerificationRequestId;

use super::DataLayerError;
use crate::model::verification_request::{
    ValidationFailure, VerificationRequest, VerificationStatus,
};

/// Storage seam for verification requests. Implementations must persist the
/// status transition atomically so a request can never be processed twice.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait VerificationRequestRepository: Send + Sync {
    async fn create(&self, request: VerificationRequest) -> Result<(), DataLayerError>;

    async fn get(
        &self,
        id: &VerificationRequestId,
    ) -> Result<Option<VerificationRequest>, DataLayerError>;

    async fn update_status(
        &self,
        id: &VerificationRequestId,
        status: VerificationStatus,
        failures: Vec<ValidationFailure>,
    ) -> Result<(), DataLayerError>;
}
