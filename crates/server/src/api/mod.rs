pub mod error;
pub mod handlers;
pub mod holds;
pub mod middleware;
pub mod routes;
pub mod tools;

pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
