pub mod error;
pub mod rest;

pub use error::{ErrorCode, RestError};
pub use rest::RestClient;
