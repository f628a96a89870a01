//! Converts an arbitrary polling cadence into whole one-second ticks.

use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

/// A 1 Hz tick source driven by monotonic time.
///
/// Fractions of a second are carried over between calls, so polling at any
/// rate yields one tick per elapsed second.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
///
/// use codebreak_app::clock::TurnClock;
///
/// let start = Instant::now();
/// let mut clock = TurnClock::new(start);
/// assert_eq!(clock.due_ticks(start + Duration::from_millis(700)), 0);
/// assert_eq!(clock.due_ticks(start + Duration::from_millis(1400)), 1);
/// assert_eq!(clock.due_ticks(start + Duration::from_millis(3000)), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TurnClock {
    last: Instant,
    carry: Duration,
}

impl TurnClock {
    /// Starts counting from `now`.
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            last: now,
            carry: Duration::ZERO,
        }
    }

    /// Returns how many ticks elapsed since the previous call.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.last) + self.carry;
        self.last = self.last.max(now);
        let ticks = elapsed.as_secs();
        self.carry = elapsed - TICK * u32::try_from(ticks).unwrap_or(u32::MAX);
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carries_fractions() {
        let start = Instant::now();
        let mut clock = TurnClock::new(start);
        let mut total = 0;
        for step in 1..=40 {
            total += clock.due_ticks(start + Duration::from_millis(step * 250));
        }
        assert_eq!(total, 10);
    }

    #[test]
    fn test_time_going_backwards_yields_nothing() {
        let start = Instant::now() + Duration::from_secs(10);
        let mut clock = TurnClock::new(start);
        assert_eq!(clock.due_ticks(start - Duration::from_secs(5)), 0);
        assert_eq!(clock.due_ticks(start + Duration::from_secs(2)), 2);
    }
}
