use chrono::{DateTime, Utc};

/// Source of "now", the sole arbiter of expiry. Injected so tests can pin
/// the issue and redeem instants.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
