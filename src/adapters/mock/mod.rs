pub mod clock;
pub mod notification_service;

pub use clock::FixedClock;
pub use notification_service::{NotificationService, SentNotification};
