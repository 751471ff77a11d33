//! # Blogflow Core
//!
//! The domain layer of Blogflow: posts, accounts, and the editorial workflow
//! that moves posts from draft to publication.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod workflow;

pub use error::{DomainError, RepoError, WorkflowError};
pub use workflow::{PostWorkflow, TransitionName};
