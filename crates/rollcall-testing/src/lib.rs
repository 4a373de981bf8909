//! Test utilities for Rollcall services.
//!
//! Provides `MockAuth` identity headers and fixed-instant time helpers.
//! Import from tests and dev-dependencies only, never from production code.

pub mod auth;
pub mod time;
