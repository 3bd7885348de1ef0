use std::sync::Arc;

use attest_crypto::Signer;
use shared_types::VerificationRequestId;
use time::OffsetDateTime;

use super::dto::{EncodedVerificationSubmission, ProcessedVerificationSubmission};
use super::validator::validate_verification_submission;
use crate::model::presentation_definition::PresentationDefinition;
use crate::model::verification_request::{
    ValidationFailure, VerificationRequest, VerificationStatus,
};
use crate::provider::credential_formatter::jwt_formatter::JWTFormatter;
use crate::provider::did_method::DidMethodProvider;
use crate::provider::revocation::StatusList2021;
use crate::repository::VerificationRequestRepository;
use crate::service::error::{BusinessLogicError, ServiceError};
use crate::util::key_verification::KeyVerification;

pub struct VerificationService {
    formatter: Arc<JWTFormatter>,
    did_method_provider: Arc<dyn DidMethodProvider>,
    signer: Arc<dyn Signer>,
    revocation: Arc<StatusList2021>,
    repository: Arc<dyn VerificationRequestRepository>,
}

impl VerificationService {
    pub fn new(
        formatter: Arc<JWTFormatter>,
        did_method_provider: Arc<dyn DidMethodProvider>,
        signer: Arc<dyn Signer>,
        revocation: Arc<StatusList2021>,
        repository: Arc<dyn VerificationRequestRepository>,
    ) -> Self {
        Self {
            formatter,
            did_method_provider,
            signer,
            revocation,
            repository,
        }
    }

    /// Opens a pending verification request for the given definition.
    pub async fn create_request(
        &self,
        presentation_definition: PresentationDefinition,
    ) -> Result<VerificationRequest, ServiceError> {
        let now = OffsetDateTime::now_utc();
        let request = VerificationRequest {
            id: VerificationRequestId::new(),
            presentation_definition,
            status: VerificationStatus::Pending,
            created_date: now,
            last_modified: now,
            failures: vec![],
        };

        self.repository.create(request.clone()).await?;
        Ok(request)
    }

    pub async fn get_request(
        &self,
        id: &VerificationRequestId,
    ) -> Result<VerificationRequest, ServiceError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| BusinessLogicError::VerificationRequestNotFound(*id).into())
    }

    /// Stateless validation of a submission against a definition.
    pub async fn process_submission(
        &self,
        submission: &EncodedVerificationSubmission,
        definition: &PresentationDefinition,
    ) -> Result<ProcessedVerificationSubmission, ServiceError> {
        validate_verification_submission(
            &self.formatter,
            &self.key_verification(),
            &self.revocation,
            submission,
            definition,
        )
        .await
    }

    /// Processes a submission against a pending request and transitions it to
    /// its terminal state. A request that already reached a terminal state
    /// rejects any further submission.
    pub async fn submit(
        &self,
        id: &VerificationRequestId,
        submission: &EncodedVerificationSubmission,
    ) -> Result<ProcessedVerificationSubmission, ServiceError> {
        let request = self.get_request(id).await?;

        if request.status.is_terminal() {
            return Err(BusinessLogicError::VerificationRequestAlreadyProcessed(*id).into());
        }

        let processed = match self
            .process_submission(submission, &request.presentation_definition)
            .await
        {
            Ok(processed) => processed,
            // an unverifiable presentation rejects the request instead of
            // leaving it pending
            Err(ServiceError::Formatter(error)) => ProcessedVerificationSubmission {
                accepted: false,
                checks: vec![],
                failures: vec![ValidationFailure {
                    message: "Invalid presentation".to_string(),
                    details: error.to_string(),
                }],
            },
            Err(error) => return Err(error),
        };

        let status = if processed.accepted {
            VerificationStatus::Approved
        } else {
            VerificationStatus::Rejected
        };
        self.repository
            .update_status(id, status, processed.failures.clone())
            .await?;

        Ok(processed)
    }

    fn key_verification(&self) -> KeyVerification {
        KeyVerification {
            did_method_provider: self.did_method_provider.clone(),
            signer: self.signer.clone(),
        }
    }
}
