use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::macros::impls_for_uuid_newtype;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct VerificationRequestId(Uuid);

impl VerificationRequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impls_for_uuid_newtype!(VerificationRequestId);
