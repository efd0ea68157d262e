//! Web server module
//!
//! Provides the JSON HTTP API of websearch-rs.

mod error;
mod handlers;
mod params;
mod routes;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use params::SearchParams;
pub use routes::create_router;
pub use state::AppState;
