pub mod error;
pub mod issuance;
pub mod verification;
