pub mod resolver;
pub mod timeouts;

pub use resolver::{resolve, Bundle, ProviderConfig};
pub use timeouts::{Operation, TimeoutPolicy};
