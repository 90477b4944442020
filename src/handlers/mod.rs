pub mod availability;
pub mod bookings;
pub mod company;
pub mod crew;
pub mod payments;
pub mod pricing;
pub mod shared;
pub mod waitlist;

pub use shared::ApiResponse;
