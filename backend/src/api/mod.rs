//! HTTP API module.
//!
//! This module provides the HTTP server and response types for the drinks API.

pub mod server;
pub mod types;

pub use server::{router, start_server, AppState};
pub use types::*;
