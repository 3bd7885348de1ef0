pub mod error;
pub mod jwt;
pub mod jwt_formatter;
