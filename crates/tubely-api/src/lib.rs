//! Tubely API Library
//!
//! HTTP surface for asset ingestion: authentication, upload handlers, asset
//! serving and application setup.

mod handlers;
pub mod setup;
pub mod telemetry;

pub mod auth;
pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
