pub mod booking_service;
pub mod conflict;
pub mod planner;
pub mod recurrence;
pub mod role_gate;
pub mod visibility;
