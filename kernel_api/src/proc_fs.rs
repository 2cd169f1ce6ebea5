//! # Proc Entries
//!
//! The read side of a `/proc` file: what a module implements
//! ([`ProcShow`]) and the protocol the host runs around it ([`OneShot`]).
//!
//! ## Read protocol
//!
//! A reader calls `read` until it returns 0. The first call on a session
//! formats the payload and returns its length; the next call returns 0 and
//! re-arms the session, so a later read produces a fresh payload. The flag
//! lives in the session, not in the module, so concurrent readers cannot
//! steal each other's end-of-stream.

use crate::{KernelError, KernelServices};
use core::fmt;
use hal::UserBuffer;

/// Mount point of the proc filesystem
pub const PROC_ROOT: &str = "/proc";

/// Size of the buffer a payload is formatted into
pub const PAYLOAD_BUFFER_SIZE: usize = 128;

/// Full path of a proc entry
pub fn proc_path(name: &str) -> String {
    format!("{}/{}", PROC_ROOT, name)
}

/// Entry name from a `/proc/<name>` path
pub fn entry_name(path: &str) -> Option<&str> {
    path.strip_prefix(PROC_ROOT)?
        .strip_prefix('/')
        .filter(|name| !name.is_empty())
}

/// Checks that `name` can be registered directly under `/proc`
pub fn validate_name(name: &str) -> Result<(), KernelError> {
    if name.is_empty() || name.contains('/') || name == "." || name == ".." {
        return Err(KernelError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Content generator for a proc entry
///
/// Called once per read cycle. Implementations write the payload into
/// `out` and may log through `kernel`.
pub trait ProcShow {
    fn show(
        &self,
        kernel: &mut dyn KernelServices,
        out: &mut PayloadBuffer,
    ) -> Result<(), KernelError>;
}

/// Fixed-size, bounds-checked formatting buffer
///
/// Writes that do not fit are rejected whole; the buffer never holds a
/// partial fragment.
///
/// # Examples
///
/// ```
/// use kernel_api::PayloadBuffer;
///
/// let mut out = PayloadBuffer::new();
/// out.print(format_args!("tick {}\n", 42)).unwrap();
/// assert_eq!(out.as_str(), "tick 42\n");
/// ```
#[derive(Clone)]
pub struct PayloadBuffer {
    bytes: [u8; PAYLOAD_BUFFER_SIZE],
    len: usize,
}

impl PayloadBuffer {
    pub fn new() -> Self {
        Self {
            bytes: [0; PAYLOAD_BUFFER_SIZE],
            len: 0,
        }
    }

    /// Appends formatted text
    pub fn print(&mut self, args: fmt::Arguments<'_>) -> Result<(), KernelError> {
        let mark = self.len;
        fmt::Write::write_fmt(self, args).map_err(|_| {
            self.len = mark;
            KernelError::PayloadOverflow {
                capacity: PAYLOAD_BUFFER_SIZE,
            }
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for PayloadBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for PayloadBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len.checked_add(s.len()).ok_or(fmt::Error)?;
        let dest = self.bytes.get_mut(self.len..end).ok_or(fmt::Error)?;
        dest.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

impl fmt::Debug for PayloadBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PayloadBuffer").field(&self.as_str()).finish()
    }
}

/// Per-session read-cycle state
///
/// The flag only flips after the payload reached the reader. A failed
/// copy leaves the session where it was, so the reader can retry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OneShot {
    completed: bool,
}

impl OneShot {
    pub fn new() -> Self {
        Self { completed: false }
    }

    /// True between a payload read and its end-of-stream read
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Runs one read callback invocation
    ///
    /// Returns the number of bytes copied, or 0 to end the cycle.
    pub fn read(
        &mut self,
        show: &dyn ProcShow,
        kernel: &mut dyn KernelServices,
        buf: &mut dyn UserBuffer,
    ) -> Result<usize, KernelError> {
        if self.completed {
            self.completed = false;
            return Ok(0);
        }

        let mut payload = PayloadBuffer::new();
        show.show(kernel, &mut payload)?;
        buf.copy_to_user(payload.as_bytes())?;

        self.completed = true;
        Ok(payload.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Jiffies;
    use hal::{Hz, SliceBuffer, UserCopyError};
    use services_logger::LogEntry;

    struct FixedClock {
        ticks: u64,
        log: Vec<LogEntry>,
    }

    impl KernelServices for FixedClock {
        fn jiffies(&mut self) -> Jiffies {
            Jiffies::new(self.ticks)
        }

        fn hz(&self) -> Hz {
            Hz::DEFAULT
        }

        fn printk(&mut self, entry: LogEntry) {
            self.log.push(entry);
        }
    }

    struct TickShow;

    impl ProcShow for TickShow {
        fn show(
            &self,
            kernel: &mut dyn KernelServices,
            out: &mut PayloadBuffer,
        ) -> Result<(), KernelError> {
            let now = kernel.jiffies();
            out.print(format_args!("tick {}\n", now))?;
            kernel.pr_info(format!("tick {}", now));
            Ok(())
        }
    }

    struct FaultingBuffer;

    impl UserBuffer for FaultingBuffer {
        fn capacity(&self) -> usize {
            4096
        }

        fn copy_to_user(&mut self, _src: &[u8]) -> Result<(), UserCopyError> {
            Err(UserCopyError::Fault)
        }
    }

    fn clock(ticks: u64) -> FixedClock {
        FixedClock {
            ticks,
            log: Vec::new(),
        }
    }

    #[test]
    fn test_proc_path_and_entry_name() {
        assert_eq!(proc_path("jiffies"), "/proc/jiffies");
        assert_eq!(entry_name("/proc/jiffies"), Some("jiffies"));
        assert_eq!(entry_name("/proc/"), None);
        assert_eq!(entry_name("/procjiffies"), None);
        assert_eq!(entry_name("/sys/jiffies"), None);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("seconds").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("..").is_err());
    }

    #[test]
    fn test_payload_buffer_rejects_overflow_whole() {
        let mut out = PayloadBuffer::new();
        out.print(format_args!("head ")).unwrap();
        let long = "x".repeat(PAYLOAD_BUFFER_SIZE);
        let err = out.print(format_args!("{}", long)).unwrap_err();

        assert_eq!(
            err,
            KernelError::PayloadOverflow {
                capacity: PAYLOAD_BUFFER_SIZE
            }
        );
        assert_eq!(out.as_str(), "head ");
    }

    #[test]
    fn test_payload_buffer_exact_fit() {
        let mut out = PayloadBuffer::new();
        let exact = "y".repeat(PAYLOAD_BUFFER_SIZE);
        out.print(format_args!("{}", exact)).unwrap();
        assert_eq!(out.len(), PAYLOAD_BUFFER_SIZE);
    }

    #[test]
    fn test_one_shot_cycles() {
        let mut kernel = clock(500);
        let mut session = OneShot::new();
        let mut backing = [0u8; 64];

        let n = session
            .read(&TickShow, &mut kernel, &mut SliceBuffer::new(&mut backing))
            .unwrap();
        assert_eq!(&backing[..n], b"tick 500\n");
        assert!(session.is_completed());

        let n = session
            .read(&TickShow, &mut kernel, &mut SliceBuffer::new(&mut backing))
            .unwrap();
        assert_eq!(n, 0);
        assert!(!session.is_completed());

        kernel.ticks = 501;
        let n = session
            .read(&TickShow, &mut kernel, &mut SliceBuffer::new(&mut backing))
            .unwrap();
        assert_eq!(&backing[..n], b"tick 501\n");
        assert_eq!(kernel.log.len(), 2);
    }

    #[test]
    fn test_one_shot_fault_keeps_session_armed() {
        let mut kernel = clock(7);
        let mut session = OneShot::new();

        let err = session
            .read(&TickShow, &mut kernel, &mut FaultingBuffer)
            .unwrap_err();
        assert_eq!(err, KernelError::BadAddress);
        assert!(!session.is_completed());

        let mut backing = [0u8; 64];
        let n = session
            .read(&TickShow, &mut kernel, &mut SliceBuffer::new(&mut backing))
            .unwrap();
        assert!(n > 0);
    }

    #[test]
    fn test_one_shot_small_buffer_is_an_error() {
        let mut kernel = clock(123_456);
        let mut session = OneShot::new();
        let mut backing = [0u8; 4];

        let err = session
            .read(&TickShow, &mut kernel, &mut SliceBuffer::new(&mut backing))
            .unwrap_err();
        assert_eq!(
            err,
            KernelError::BufferTooSmall {
                needed: 12,
                available: 4
            }
        );
        assert!(!session.is_completed());
    }
}
