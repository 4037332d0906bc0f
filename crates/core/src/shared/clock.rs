use std::time::Instant;

/// Time source for state deadlines.
///
/// Injected so tests can advance time without sleeping.
pub trait Clock: Send {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
