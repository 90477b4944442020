pub mod boat;
pub mod booking;
pub mod company;
pub mod crew;
pub mod history;
pub(crate) mod macros;
pub mod payment;
pub mod pricing;
pub mod waitlist;

pub use boat::{BlockedSlot, Boat, BoatSummary, CreateBlockedSlotInput};
pub use booking::{
    Booking, BookingCategory, BookingStatus, CancelBookingInput, ConfirmBookingInput,
    CreateBookingInput, CreateMode, PackageType, UpdateBookingInput,
};
pub use company::{Company, UpdateCompanySettingsInput};
pub use crew::{BookingSailor, CrewMember, CrewRole, FeeMode};
pub use history::{
    AppendHistoryInput, BookingAction, BookingHistoryEntry, BookingSnapshot, FieldChange,
};
pub use payment::{
    BookingBalance, PaymentMethod, PaymentTransaction, PaymentType, RecordTransactionInput,
};
pub use pricing::{DurationSlot, Pricing, PricingInput};
pub use waitlist::{CreateWaitlistInput, WaitlistEntry, WaitlistStatus};
