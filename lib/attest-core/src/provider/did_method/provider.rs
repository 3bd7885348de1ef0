use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use shared_types::DidValue;

use super::{DidDocument, DidMethod, DidMethodError};

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait DidMethodProvider: Send + Sync {
    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, DidMethodError>;
}

pub struct DidMethodProviderImpl {
    did_methods: HashMap<String, Arc<dyn DidMethod>>,
}

impl DidMethodProviderImpl {
    pub fn new(did_methods: HashMap<String, Arc<dyn DidMethod>>) -> Self {
        Self { did_methods }
    }
}

#[async_trait]
impl DidMethodProvider for DidMethodProviderImpl {
    async fn resolve(&self, did: &DidValue) -> Result<DidDocument, DidMethodError> {
        let method = did
            .method()
            .ok_or_else(|| DidMethodError::ResolutionError(format!("malformed did: {did}")))?;

        let did_method = self
            .did_methods
            .get(method)
            .ok_or_else(|| DidMethodError::NotSupported(method.to_string()))?;

        did_method.resolve(did).await
    }
}
