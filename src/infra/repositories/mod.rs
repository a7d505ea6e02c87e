pub mod sqlite_booking_repo;
