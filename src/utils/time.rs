use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

/// Source of wall-clock time for the quiz countdown.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Converts wall-clock progress into whole-second ticks.
///
/// Sub-second remainders carry over to the next poll, so polling late or
/// irregularly never loses or duplicates a second.
#[derive(Debug, Clone)]
pub struct Countdown {
    last_tick: DateTime<Utc>,
}

impl Countdown {
    pub fn start(clock: &dyn Clock) -> Self {
        Self {
            last_tick: clock.now(),
        }
    }

    pub fn elapsed_ticks(&mut self, clock: &dyn Clock) -> u32 {
        let now = clock.now();
        let elapsed = (now - self.last_tick).num_seconds();
        if elapsed <= 0 {
            return 0;
        }
        self.last_tick += Duration::seconds(elapsed);
        u32::try_from(elapsed).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerUrgency {
    Normal,
    Warning,
    Critical,
}

impl TimerUrgency {
    pub fn for_remaining(seconds: u32) -> Self {
        match seconds {
            0..=10 => TimerUrgency::Critical,
            11..=30 => TimerUrgency::Warning,
            _ => TimerUrgency::Normal,
        }
    }
}

/// Renders seconds as `m:ss`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
