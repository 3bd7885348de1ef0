use serde::{Deserialize, Serialize};

use crate::model::credential::{VerifiableCredential, VerifiablePresentation};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VcClaim {
    pub vc: VerifiableCredential,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VpClaim {
    pub vp: VerifiablePresentation,
}
