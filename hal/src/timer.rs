//! # Timer Device
//!
//! Hardware abstraction for the kernel tick counter.
//!
//! ## Philosophy
//!
//! **Time is a service, not a global variable.**
//!
//! Modules never read a global `jiffies`. The host hands them a monotonic
//! tick count and the rate it advances at, and the module does its own
//! arithmetic. This keeps every timing value in a module reproducible under
//! a simulated clock.
//!
//! ## Design Principles
//!
//! 1. **Monotonic**: Ticks never go backwards
//! 2. **Non-blocking**: Always returns immediately
//! 3. **Cumulative**: Returns total ticks since the counter was started
//! 4. **Rate is separate**: [`Hz`] travels alongside the counter, it is not
//!    baked into it

use core::fmt;
use core::num::NonZeroU32;
use core::time::Duration;

/// Hardware timer device trait
///
/// Provides access to a monotonic tick counter. Ticks are cumulative
/// and never decrease.
///
/// # Examples
///
/// ```
/// use hal::TimerDevice;
///
/// fn elapsed<T: TimerDevice>(timer: &mut T, since: u64) -> u64 {
///     timer.poll_ticks().wrapping_sub(since)
/// }
/// ```
pub trait TimerDevice {
    /// Returns the current tick count
    ///
    /// The value is monotonic and non-blocking. It is a 64-bit counter, so
    /// callers computing differences should use wrapping arithmetic the way
    /// the kernel does.
    fn poll_ticks(&mut self) -> u64;
}

/// Tick rate of the timer (ticks per second)
///
/// Never zero, so dividing by it is always defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hz(NonZeroU32);

impl Hz {
    /// The common desktop configuration (`CONFIG_HZ=250`)
    pub const DEFAULT: Hz = Hz(match NonZeroU32::new(250) {
        Some(rate) => rate,
        None => unreachable!(),
    });

    /// Creates a tick rate; returns `None` for zero
    pub fn new(rate: u32) -> Option<Self> {
        NonZeroU32::new(rate).map(Self)
    }

    /// Returns the rate as a plain integer
    pub fn get(&self) -> u32 {
        self.0.get()
    }

    /// Number of whole ticks that elapse in `duration`
    ///
    /// Sub-tick remainders are truncated.
    pub fn ticks_in(&self, duration: Duration) -> u64 {
        let ticks = duration.as_nanos() * u128::from(self.get()) / 1_000_000_000;
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }

    /// Whole seconds covered by `ticks`, truncating toward zero
    pub fn whole_seconds(&self, ticks: u64) -> u64 {
        ticks / u64::from(self.get())
    }

    /// Microseconds covered by `ticks`
    pub fn micros(&self, ticks: u64) -> u128 {
        u128::from(ticks) * 1_000_000 / u128::from(self.get())
    }
}

impl Default for Hz {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Hz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
