use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::macros::{impl_display, impl_from};

/// Well-known identifier of a credential manifest, e.g. `KYCAMLAttestation`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct ManifestId(String);

impl ManifestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ManifestId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_owned()))
    }
}

impl From<&str> for ManifestId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl_from!(ManifestId; String);
impl_display!(ManifestId);
