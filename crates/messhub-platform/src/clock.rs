//! Wall clock
//!
//! Injectable time source so stored-record expiry can be tested.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

#[derive(Debug)]
enum ClockSource {
    System,
    Fixed(DateTime<Utc>),
}

/// Shared wall-clock handle
#[derive(Debug, Clone)]
pub struct Clock {
    source: Arc<Mutex<ClockSource>>,
}

impl Clock {
    /// Real system time
    pub fn system() -> Self {
        Self {
            source: Arc::new(Mutex::new(ClockSource::System)),
        }
    }

    /// Manually advanced time starting at `start`
    pub fn fixed(start: DateTime<Utc>) -> Self {
        Self {
            source: Arc::new(Mutex::new(ClockSource::Fixed(start))),
        }
    }

    /// Current time
    pub fn now(&self) -> DateTime<Utc> {
        match *self.source.lock().unwrap() {
            ClockSource::System => Utc::now(),
            ClockSource::Fixed(at) => at,
        }
    }

    /// Advance a fixed clock; no effect on the system clock
    pub fn advance(&self, by: Duration) {
        let mut source = self.source.lock().unwrap();
        if let ClockSource::Fixed(at) = *source {
            *source = ClockSource::Fixed(at + by);
        }
    }
}
