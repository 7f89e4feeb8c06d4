//! Clients for the drinks API server.
//!
//! # Services
//!
//! - [`drinks`] - Drinks menu API (list, detail, create/update, delete)

pub mod drinks;

pub use drinks::*;
