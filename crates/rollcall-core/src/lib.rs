//! Shared service plumbing for Rollcall services.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod response;
pub mod serde;
pub mod tracing;
