//! Counters.

use crate::*;

/// Countdown timer register.
///
/// Counts down while `wait` is asserted and holds at zero, reloading its limit whenever `wait` is deasserted.
/// `done` is asserted while the count is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaitTimer {
    count: u32,
    limit: u32,
}

impl_signal_default!(WaitTimer);

impl WaitTimer {
    /// Creates a timer that is done `limit` waiting cycles after it is loaded.
    pub fn new(limit: u32) -> Self { Self { count: limit, limit } }

    /// Returns whether the timer expired.
    pub fn done(&self) -> bool { self.count == 0 }

    /// Returns the remaining count.
    pub fn count(&self) -> u32 { self.count }

    /// Returns the timer for the next cycle.
    pub fn tick(&self, wait: bool) -> Self {
        let count = if !wait {
            self.limit
        } else {
            self.count.saturating_sub(1)
        };
        Self { count, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_while_waiting() {
        let mut timer = WaitTimer::new(3);
        let mut trace = Vec::new();
        for wait in [true, true, true, true, false, true] {
            trace.push(timer.done());
            timer = timer.tick(wait);
        }
        assert_eq!(trace, vec![false, false, false, true, true, false]);
        assert_eq!(timer.count(), 2);
        assert!(WaitTimer::x().done());
    }
}
