pub mod credential_formatter;
pub mod did_method;
pub mod revocation;
