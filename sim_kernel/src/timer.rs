//! # Simulated Timer Device
//!
//! Deterministic tick counter for testing.
//!
//! The counter only moves when a test (or the host script) says so. A
//! module that reads it twice without anything advancing it sees the same
//! value twice.

use hal::TimerDevice;
use kernel_api::Jiffies;

/// Simulated timer device with controllable time progression
///
/// # Examples
///
/// ```
/// use sim_kernel::timer::SimTimerDevice;
/// use hal::TimerDevice;
///
/// let mut timer = SimTimerDevice::starting_at(1000);
/// assert_eq!(timer.poll_ticks(), 1000);
///
/// timer.advance_ticks(750);
/// assert_eq!(timer.poll_ticks(), 1750);
/// ```
#[derive(Debug, Clone)]
pub struct SimTimerDevice {
    ticks: u64,
}

impl SimTimerDevice {
    /// Creates a timer whose counter reads `ticks`
    pub fn starting_at(ticks: u64) -> Self {
        Self { ticks }
    }

    /// Advances the counter by `delta` ticks
    ///
    /// The counter is a free-running 64-bit value and wraps like one.
    pub fn advance_ticks(&mut self, delta: u64) {
        self.ticks = self.ticks.wrapping_add(delta);
    }

    /// Moves the counter forward to `new_ticks`
    ///
    /// # Panics
    ///
    /// Panics if `new_ticks` is behind the current count.
    pub fn set_ticks(&mut self, new_ticks: u64) {
        assert!(
            new_ticks >= self.ticks,
            "Cannot set ticks backwards: {} < {}",
            new_ticks,
            self.ticks
        );
        self.ticks = new_ticks;
    }

    /// Current counter value, without needing `&mut`
    pub fn now(&self) -> Jiffies {
        Jiffies::new(self.ticks)
    }
}

impl TimerDevice for SimTimerDevice {
    fn poll_ticks(&mut self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_given_tick() {
        let mut timer = SimTimerDevice::starting_at(500);
        assert_eq!(timer.poll_ticks(), 500);
        assert_eq!(timer.now(), Jiffies::new(500));
    }

    #[test]
    fn test_polling_does_not_advance() {
        let mut timer = SimTimerDevice::starting_at(10);
        assert_eq!(timer.poll_ticks(), timer.poll_ticks());
    }

    #[test]
    fn test_advance_accumulates() {
        let mut timer = SimTimerDevice::starting_at(0);
        for delta in [10, 20, 5] {
            timer.advance_ticks(delta);
        }
        assert_eq!(timer.poll_ticks(), 35);
    }

    #[test]
    fn test_advance_wraps() {
        let mut timer = SimTimerDevice::starting_at(u64::MAX);
        timer.advance_ticks(2);
        assert_eq!(timer.poll_ticks(), 1);
    }

    #[test]
    fn test_set_ticks_forward() {
        let mut timer = SimTimerDevice::starting_at(1000);
        timer.set_ticks(1750);
        assert_eq!(timer.poll_ticks(), 1750);
    }

    #[test]
    #[should_panic(expected = "Cannot set ticks backwards")]
    fn test_set_ticks_backwards_panics() {
        let mut timer = SimTimerDevice::starting_at(100);
        timer.set_ticks(50);
    }
}
