pub mod booking;
pub mod role;
