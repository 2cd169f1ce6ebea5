//! Simulated user-space destination buffers

use hal::{UserBuffer, UserCopyError};

/// A reader's buffer in simulated user memory
///
/// Has a fixed capacity, like the `count` argument of `read(2)`. A buffer
/// built with [`faulting`](SimUserBuffer::faulting) stands for a bad
/// pointer and rejects every copy.
#[derive(Debug, Clone)]
pub struct SimUserBuffer {
    data: Vec<u8>,
    capacity: usize,
    faulting: bool,
}

impl SimUserBuffer {
    /// Creates a valid buffer of `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            faulting: false,
        }
    }

    /// Creates a buffer whose address is not mapped
    pub fn faulting(capacity: usize) -> Self {
        Self {
            faulting: true,
            ..Self::new(capacity)
        }
    }

    /// Bytes from the most recent successful copy
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Bytes from the most recent successful copy, as text
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

impl UserBuffer for SimUserBuffer {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn copy_to_user(&mut self, src: &[u8]) -> Result<(), UserCopyError> {
        if self.faulting {
            return Err(UserCopyError::Fault);
        }
        if src.len() > self.capacity {
            return Err(UserCopyError::TooSmall {
                needed: src.len(),
                available: self.capacity,
            });
        }
        self.data.clear();
        self.data.extend_from_slice(src);
        Ok(())
    }
}
