//! # User Memory
//!
//! The kernel-to-user copy primitive.
//!
//! A read callback never writes into caller memory directly. It hands the
//! bytes to a [`UserBuffer`], which is the only thing that knows whether the
//! destination is valid and how much room it has.

use thiserror::Error;

/// Errors from copying into user memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UserCopyError {
    /// The destination does not map to writable user memory
    #[error("bad user address")]
    Fault,

    /// The destination is smaller than the data
    #[error("user buffer too small: need {needed} bytes, have {available}")]
    TooSmall { needed: usize, available: usize },
}

/// Destination buffer supplied by a reader
///
/// Mirrors `copy_to_user`: either all of `src` lands in the buffer or
/// nothing does.
pub trait UserBuffer {
    /// Number of bytes the caller asked for
    fn capacity(&self) -> usize;

    /// Copies `src` into the start of the buffer
    fn copy_to_user(&mut self, src: &[u8]) -> Result<(), UserCopyError>;
}

/// A user buffer backed by a plain byte slice
///
/// # Examples
///
/// ```
/// use hal::{SliceBuffer, UserBuffer};
///
/// let mut backing = [0u8; 8];
/// let mut buf = SliceBuffer::new(&mut backing);
/// buf.copy_to_user(b"hi").unwrap();
/// assert_eq!(&backing[..2], b"hi");
/// ```
#[derive(Debug)]
pub struct SliceBuffer<'a> {
    bytes: &'a mut [u8],
}

impl<'a> SliceBuffer<'a> {
    /// Wraps a byte slice
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes }
    }
}

impl UserBuffer for SliceBuffer<'_> {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn copy_to_user(&mut self, src: &[u8]) -> Result<(), UserCopyError> {
        let available = self.bytes.len();
        let dest = self
            .bytes
            .get_mut(..src.len())
            .ok_or(UserCopyError::TooSmall {
                needed: src.len(),
                available,
            })?;
        dest.copy_from_slice(src);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_buffer_copy() {
        let mut backing = [0u8; 4];
        let mut buf = SliceBuffer::new(&mut backing);
        assert_eq!(buf.capacity(), 4);
        buf.copy_to_user(b"abcd").unwrap();
        assert_eq!(&backing, b"abcd");
    }

    #[test]
    fn test_slice_buffer_too_small_leaves_contents() {
        let mut backing = [0u8; 2];
        let mut buf = SliceBuffer::new(&mut backing);
        let err = buf.copy_to_user(b"abc").unwrap_err();
        assert_eq!(
            err,
            UserCopyError::TooSmall {
                needed: 3,
                available: 2
            }
        );
        assert_eq!(backing, [0, 0]);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(UserCopyError::Fault.to_string(), "bad user address");
    }
}
