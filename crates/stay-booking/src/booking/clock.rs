use std::sync::RwLock;

use chrono::{Days, FixedOffset, NaiveDate, Utc};

/// Source of "today" for the stay rules.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock pinned to a reference UTC offset, so the date flips at the same instant for
/// every guest regardless of where the server runs.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

/// Clock frozen on a chosen date; used by tests and the CLI demo.
#[derive(Debug)]
pub struct FixedClock {
    today: RwLock<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: RwLock::new(today),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        *self.today.write().expect("clock lock poisoned") = today;
    }

    pub fn advance(&self, days: u64) {
        let mut guard = self.today.write().expect("clock lock poisoned");
        if let Some(next) = guard.checked_add_days(Days::new(days)) {
            *guard = next;
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.read().expect("clock lock poisoned")
    }
}
