//! Auth types shared across Rollcall services.
//!
//! Bearer credentials are verified by the gateway; services only see the identity it
//! injects. Provides the `IdentityHeaders` extractor for that identity.

pub mod identity;

pub use identity::{IdentityHeaders, X_ROLLCALL_USER_ID, X_ROLLCALL_USER_ROLE};
