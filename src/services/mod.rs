pub mod booking;
pub mod events;
pub mod fees;
pub mod history;
pub mod ledger;
pub mod sweeper;

pub use booking::{BookingOutcome, BookingService};
pub use events::{BookingEvent, EventPublisher};
pub use ledger::{LedgerOutcome, LedgerService};
pub use sweeper::HoldSweeper;
