pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod types;

pub use config::Config;
pub use error::ApiError;
pub use router::{AppState, app_router};
