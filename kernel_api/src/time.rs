//! Tick-based time

use core::fmt;
use hal::Hz;
use serde::{Deserialize, Serialize};

/// A value of the kernel tick counter
///
/// Differences between two readings use wrapping arithmetic, matching how
/// an unsigned `jiffies` delta behaves across a counter wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Jiffies(u64);

impl Jiffies {
    /// Creates a reading from a raw tick count
    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    /// The counter value at boot for a given rate
    ///
    /// This is `INITIAL_JIFFIES`: minus five minutes of ticks truncated to
    /// 32 bits, so 32-bit wrap bugs show up shortly after boot.
    pub fn initial(hz: Hz) -> Self {
        let ticks = (300u32).wrapping_mul(hz.get()).wrapping_neg();
        Self(u64::from(ticks))
    }

    /// Returns the raw tick count
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Ticks elapsed since `earlier`
    pub fn ticks_since(&self, earlier: Jiffies) -> u64 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Whole seconds elapsed since `earlier`, truncating toward zero
    pub fn seconds_since(&self, earlier: Jiffies, hz: Hz) -> u64 {
        hz.whole_seconds(self.ticks_since(earlier))
    }
}

impl From<u64> for Jiffies {
    fn from(ticks: u64) -> Self {
        Self(ticks)
    }
}

impl fmt::Display for Jiffies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
