//! # Blogflow Shared
//!
//! Shared types between frontend and backend.
//! Any front end (HTTP, CLI, WASM) can depend on it without pulling in the server.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
