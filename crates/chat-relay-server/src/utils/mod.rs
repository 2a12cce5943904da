pub mod error;

pub use error::{ApiError, GatewayError};
