use serde::{Deserialize, Serialize};

use crate::model::credential::VerifiableCredential;

pub const STATUS_LIST_2021_ENTRY: &str = "StatusList2021Entry";
pub const STATUS_LIST_2021_CREDENTIAL: &str = "StatusList2021Credential";
pub const REVOCATION_LIST_2021_SUBJECT: &str = "RevocationList2021";

/// A credential whose subject carries a `RevocationList2021` encoded list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevocationListCredential {
    credential: VerifiableCredential,
}

impl RevocationListCredential {
    pub fn list_url(&self) -> Option<&str> {
        self.credential.id.as_deref()
    }

    pub fn encoded_list(&self) -> Option<&str> {
        self.credential
            .credential_subject
            .claims
            .get("encodedList")?
            .as_str()
    }

    pub fn as_credential(&self) -> &VerifiableCredential {
        &self.credential
    }

    pub fn into_credential(self) -> VerifiableCredential {
        self.credential
    }
}

impl TryFrom<VerifiableCredential> for RevocationListCredential {
    type Error = String;

    fn try_from(credential: VerifiableCredential) -> Result<Self, Self::Error> {
        let subject_type = credential
            .credential_subject
            .claims
            .get("type")
            .and_then(|value| value.as_str());
        if subject_type != Some(REVOCATION_LIST_2021_SUBJECT) {
            return Err(format!(
                "not a revocation list credential, subject type: {subject_type:?}"
            ));
        }

        let has_encoded_list = credential
            .credential_subject
            .claims
            .get("encodedList")
            .is_some_and(|value| value.is_string());
        if !has_encoded_list {
            return Err("revocation list credential without encodedList".to_string());
        }

        Ok(Self { credential })
    }
}
