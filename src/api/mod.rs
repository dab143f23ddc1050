//! REST API implementation.

pub mod errors;
pub mod routes;
pub mod state;
pub mod types;

pub use errors::ApiError;
pub use state::ApiState;
