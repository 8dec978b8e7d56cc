use phantom_stamper_core::Clock;
use std::sync::Mutex;

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct MockClock {
    now_l: Mutex<time::OffsetDateTime>,
}

impl MockClock {
    pub fn new(now: time::OffsetDateTime) -> Self {
        Self {
            now_l: Mutex::new(now),
        }
    }
    pub fn set(&self, now: time::OffsetDateTime) {
        *self.now_g() = now;
    }
    pub fn advance(&self, duration: time::Duration) {
        *self.now_g() += duration;
    }
    fn now_g(&self) -> std::sync::MutexGuard<'_, time::OffsetDateTime> {
        self.now_l
            .lock()
            .expect("programmer error: MockClock lock poisoned")
    }
}

impl Clock for MockClock {
    fn now_utc(&self) -> time::OffsetDateTime {
        *self.now_g()
    }
}
