mod checkin_test;
mod credential_test;
mod eligibility_test;
mod router_test;
