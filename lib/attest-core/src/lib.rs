//! Core library for issuing, holding and verifying attestation credentials.
//!
//! The crate is organized in three layers: `model` carries the wire-level
//! data structures, `provider` the pluggable building blocks (DID methods,
//! the JWT credential codec, StatusList2021 revocation) and `service` the
//! issuance and verification protocols built on top of them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use attest_crypto::Signer;
use attest_crypto::signer::eddsa::EDDSASigner;

use config::CoreConfig;
use provider::credential_formatter::jwt_formatter::{self, JWTFormatter};
use provider::did_method::key::KeyDidMethod;
use provider::did_method::{DidMethod, DidMethodProvider, DidMethodProviderImpl};
use provider::revocation::{self, StatusList2021};
use repository::VerificationRequestRepository;
use service::issuance::{IssuanceService, ManifestRegistry};
use service::verification::VerificationService;

pub mod config;
pub mod model;
pub mod provider;
pub mod repository;
pub mod service;
pub mod util;

/// Everything wired together: one issuer/verifier node.
pub struct AttestCore {
    pub formatter: Arc<JWTFormatter>,
    pub did_method_provider: Arc<dyn DidMethodProvider>,
    pub revocation: Arc<StatusList2021>,
    pub issuance_service: IssuanceService,
    pub verification_service: VerificationService,
}

impl AttestCore {
    pub fn new(
        config: CoreConfig,
        registry: ManifestRegistry,
        verification_request_repository: Arc<dyn VerificationRequestRepository>,
    ) -> Self {
        let signer: Arc<dyn Signer> = Arc::new(EDDSASigner {});

        let did_methods: HashMap<String, Arc<dyn DidMethod>> =
            HashMap::from([("key".to_string(), Arc::new(KeyDidMethod) as _)]);
        let did_method_provider: Arc<dyn DidMethodProvider> =
            Arc::new(DidMethodProviderImpl::new(did_methods));

        let formatter = Arc::new(JWTFormatter::new(jwt_formatter::Params {
            leeway: config.formatter.leeway,
        }));

        let revocation = Arc::new(StatusList2021::new(
            formatter.clone(),
            did_method_provider.clone(),
            signer.clone(),
            revocation::Params {
                fail_open: config.revocation.fail_open,
                fetch_timeout: Duration::from_secs(config.revocation.fetch_timeout_seconds),
            },
        ));

        let issuance_service = IssuanceService::new(
            formatter.clone(),
            did_method_provider.clone(),
            signer.clone(),
            registry,
        );

        let verification_service = VerificationService::new(
            formatter.clone(),
            did_method_provider.clone(),
            signer,
            revocation.clone(),
            verification_request_repository,
        );

        Self {
            formatter,
            did_method_provider,
            revocation,
            issuance_service,
            verification_service,
        }
    }
}
