//! sea-orm entities for the attendance service.
//!
//! `schedules` and `group_members` are written by the scheduling/membership side of the
//! system; this service only reads them.

pub mod attendances;
pub mod checkin_credentials;
pub mod group_members;
pub mod invite_codes;
pub mod schedules;
