pub mod bitstring;
pub mod jsonpath;
pub mod key_verification;
