use std::collections::HashMap;

use shared_types::ManifestId;

use crate::model::manifest::CredentialManifest;

pub mod dto;
pub mod mapper;
pub mod service;


pub use service::IssuanceService;

/// The manifests an issuer is willing to fulfill, keyed by manifest id.
/// Applications referencing anything else are rejected outright.
#[derive(Default)]
pub struct ManifestRegistry {
    manifests: HashMap<ManifestId, CredentialManifest>,
}

impl ManifestRegistry {
    pub fn new(manifests: Vec<CredentialManifest>) -> Self {
        Self {
            manifests: manifests
                .into_iter()
                .map(|manifest| (manifest.id.clone(), manifest))
                .collect(),
        }
    }

    pub fn register(&mut self, manifest: CredentialManifest) {
        self.manifests.insert(manifest.id.clone(), manifest);
    }

    pub fn get(&self, id: &ManifestId) -> Option<&CredentialManifest> {
        self.manifests.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ManifestId> {
        self.manifests.keys()
    }
}
