use crate::domain::Booking;
use crate::ports::notification_service::{NotificationService as NotificationServiceTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// A confirmation that was handed to the mock notification service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentNotification {
    BookingConfirmation(Booking),
    CancellationConfirmation(Booking),
}

/// Mock implementation of NotificationService
///
/// Does not deliver anything. Confirmations are logged and recorded
/// so tests can inspect them. Can be switched to fail every call.
pub struct NotificationService {
    sent: Mutex<Vec<SentNotification>>,
    failing: AtomicBool,
}

impl NotificationService {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Notifications recorded so far, in the order they were sent
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, notification: SentNotification) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("notification channel unavailable".into());
        }
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn send_booking_confirmation(&self, booking: &Booking) -> Result<()> {
        self.record(SentNotification::BookingConfirmation(booking.clone()))?;
        tracing::info!(
            booking_id = %booking.booking_id(),
            room_id = %booking.room_id(),
            start_time = %booking.start_time(),
            end_time = %booking.end_time(),
            "booking confirmation sent"
        );
        Ok(())
    }

    async fn send_cancellation_confirmation(&self, booking: &Booking) -> Result<()> {
        self.record(SentNotification::CancellationConfirmation(booking.clone()))?;
        tracing::info!(
            booking_id = %booking.booking_id(),
            room_id = %booking.room_id(),
            "cancellation confirmation sent"
        );
        Ok(())
    }
}
