mod did_value;
mod macros;
mod manifest_id;
mod verification_request_id;

pub use did_value::DidValue;
pub use manifest_id::ManifestId;
pub use verification_request_id::VerificationRequestId;
