//! Test utilities
//!
//! Helpers for module and host tests that drive a [`SimulatedKernel`].

use crate::{SimUserBuffer, SimulatedKernel, CAT_BUFFER_SIZE};
use hal::Hz;
use kernel_api::{Jiffies, KernelError};

/// A kernel whose counter currently reads `ticks`, at `hz`
///
/// # Panics
///
/// Panics if `hz` is zero.
pub fn kernel_at(ticks: u64, hz: u32) -> SimulatedKernel {
    let hz = Hz::new(hz).expect("test kernel needs a non-zero tick rate");
    SimulatedKernel::booted_at(Jiffies::new(ticks), hz)
}

/// Outcome of one read invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    pub bytes: usize,
    pub text: String,
}

/// Opens `path` and performs `count` sequential reads on one session
pub fn read_sequence(
    kernel: &mut SimulatedKernel,
    path: &str,
    count: usize,
) -> Result<Vec<ReadOutcome>, KernelError> {
    let mut file = kernel.open(path)?;
    let mut outcomes = Vec::with_capacity(count);
    for _ in 0..count {
        let mut buf = SimUserBuffer::new(CAT_BUFFER_SIZE);
        let bytes = kernel.read(&mut file, &mut buf)?;
        let text = if bytes == 0 {
            String::new()
        } else {
            buf.as_text()
        };
        outcomes.push(ReadOutcome { bytes, text });
    }
    Ok(outcomes)
}

/// Returns true if any log message contains `needle`
pub fn log_contains(kernel: &SimulatedKernel, needle: &str) -> bool {
    kernel
        .log()
        .entries()
        .any(|entry| entry.message.contains(needle))
}
