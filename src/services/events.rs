use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Domain events emitted synchronously after a committed mutation. Rendering
/// and delivery (mail, dashboards) are collaborator concerns; subscribers get
/// a broadcast receiver and do their own fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingEvent {
    BookingCreated { booking_id: Uuid, company_id: Uuid },
    BookingConfirmed { booking_id: Uuid, company_id: Uuid },
    BookingCancelled { booking_id: Uuid, company_id: Uuid, reason: String },
    BookingCompleted { booking_id: Uuid, company_id: Uuid },
    BookingNoShow { booking_id: Uuid, company_id: Uuid },
    HoldExpired { booking_id: Uuid, company_id: Uuid },
    PaymentReceived { booking_id: Uuid, company_id: Uuid, amount: BigDecimal },
}

#[derive(Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<BookingEvent>,
}

impl EventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.sender.subscribe()
    }

    /// Publishing with no subscribers is not an error; nobody listening means
    /// nobody to notify.
    pub fn publish(&self, event: BookingEvent) {
        if let Err(e) = self.sender.send(event) {
            log::debug!("No event subscribers: {}", e);
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let publisher = EventPublisher::new(8);
        let mut rx = publisher.subscribe();

        let booking_id = Uuid::new_v4();
        let company_id = Uuid::new_v4();
        publisher.publish(BookingEvent::BookingConfirmed {
            booking_id,
            company_id,
        });

        match rx.recv().await.unwrap() {
            BookingEvent::BookingConfirmed {
                booking_id: b,
                company_id: c,
            } => {
                assert_eq!(b, booking_id);
                assert_eq!(c, company_id);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let publisher = EventPublisher::new(8);
        publisher.publish(BookingEvent::HoldExpired {
            booking_id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
        });
    }
}
