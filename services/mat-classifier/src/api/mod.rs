//! HTTP API 层

pub mod dto;
pub mod handlers;
pub mod routes;

mod conversions;
mod extract;
mod multipart;

pub use handlers::AppState;
pub use routes::build_router;
