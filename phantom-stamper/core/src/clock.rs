/// Source of the current time.  Injected everywhere a timestamp is taken so that expiration
/// behavior can be driven deterministically.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> time::OffsetDateTime;
}

/// The wall clock, truncated to millisecond precision.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> time::OffsetDateTime {
        crate::now_utc_milliseconds()
    }
}
