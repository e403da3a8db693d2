use crate::ports::clock::Clock;
use chrono::{DateTime, Utc};

/// Clock backed by the system time (UTC).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
