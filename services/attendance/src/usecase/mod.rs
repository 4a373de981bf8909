pub mod attendance;
pub mod checkin;
pub mod credential;
pub mod eligibility;
pub mod invite;
