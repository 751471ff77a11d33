//! # Blogflow Infrastructure
//!
//! Concrete implementations of the ports defined in `blogflow-core`.
//! This crate contains database, in-memory, and authentication integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;
pub mod memory;
pub mod notify;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use memory::{InMemoryPostStore, InMemoryUserRepository};
pub use notify::TracingNotifier;

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
