pub mod dto;
pub mod mapper;
pub mod service;
pub(crate) mod validator;


pub use service::VerificationService;
