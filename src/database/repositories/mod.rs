pub mod availability;
pub mod boat;
pub mod booking;
pub mod company;
pub mod crew;
pub mod history;
pub mod payment;
pub mod pricing;
pub mod waitlist;

// Re-export all repositories for easy importing
pub use availability::AvailabilityRepository;
pub use boat::BoatRepository;
pub use booking::{BookingRepository, BookingUpdate, NewBooking, NewBookingSailor};
pub use company::CompanyRepository;
pub use crew::CrewRepository;
pub use history::HistoryRepository;
pub use payment::PaymentRepository;
pub use pricing::PricingRepository;
pub use waitlist::WaitlistRepository;
