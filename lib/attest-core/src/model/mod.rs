pub mod attestation;
pub mod credential;
pub mod did;
pub mod manifest;
pub mod presentation_definition;
pub mod verification_request;
