use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

/// Definition id of the proof-of-identifier-control presentation every
/// credential application carries.
pub const PROOF_OF_CONTROL_PRESENTATION_DEFINITION_ID: &str =
    "ProofOfControlPresentationDefinition";

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresentationDefinition {
    pub id: String,
    pub input_descriptors: Vec<InputDescriptor>,
    pub format: Option<ClaimFormatDesignations>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputDescriptor {
    pub id: String,
    pub name: Option<String>,
    pub purpose: Option<String>,
    pub schema: Vec<SchemaReference>,
    pub constraints: Option<Constraints>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchemaReference {
    pub uri: String,
    pub required: Option<bool>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default)]
    pub fields: Vec<ConstraintField>,
    pub statuses: Option<ConstraintStatuses>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintField {
    /// Candidate paths, tried in order until one resolves.
    pub path: Vec<String>,
    pub purpose: Option<String>,
    pub predicate: Option<String>,
    pub filter: Option<ConstraintFilter>,
}

/// Closed filter vocabulary evaluated against a resolved field value.
/// Arbitrary JSON Schema keywords are deliberately not supported.
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintFilter {
    #[serde(rename = "type")]
    pub r#type: Option<FilterType>,
    pub pattern: Option<String>,
    pub minimum: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    String,
    Number,
    Boolean,
}

impl ConstraintFilter {
    pub fn matches(&self, value: &Value) -> bool {
        if let Some(filter_type) = &self.r#type {
            let type_matches = match filter_type {
                FilterType::String => value.is_string(),
                FilterType::Number => value.is_number(),
                FilterType::Boolean => value.is_boolean(),
            };
            if !type_matches {
                return false;
            }
        }

        if let Some(pattern) = &self.pattern {
            let Some(candidate) = value.as_str() else {
                return false;
            };
            let matches = Regex::new(pattern)
                .map(|regex| regex.is_match(candidate))
                .unwrap_or(false);
            if !matches {
                return false;
            }
        }

        if let Some(minimum) = self.minimum {
            let Some(candidate) = value.as_f64() else {
                return false;
            };
            if candidate < minimum {
                return false;
            }
        }

        true
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintStatuses {
    pub active: Option<StatusConstraint>,
    pub suspended: Option<StatusConstraint>,
    pub revoked: Option<StatusConstraint>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusConstraint {
    pub directive: StatusDirective,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusDirective {
    Required,
    Allowed,
    Disallowed,
}

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClaimFormatDesignations {
    pub jwt_vc: Option<JwtAlgorithms>,
    pub jwt_vp: Option<JwtAlgorithms>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JwtAlgorithms {
    pub alg: Vec<String>,
}

/// Submission pointing matched credentials back at the definition that
/// requested them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresentationSubmission {
    pub id: String,
    pub definition_id: String,
    pub descriptor_map: Vec<DescriptorMapEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DescriptorMapEntry {
    pub id: String,
    pub format: String,
    pub path: String,
}
