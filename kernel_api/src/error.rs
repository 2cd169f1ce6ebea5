//! Kernel error types

use hal::UserCopyError;
use thiserror::Error;

/// Errors that can occur when interacting with the kernel
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KernelError {
    /// No such proc entry, module or path
    #[error("No such file or directory: {0}")]
    NotFound(String),

    /// Name already registered
    #[error("File exists: {0}")]
    AlreadyExists(String),

    /// Name cannot be used for a proc entry
    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    /// Reader's buffer cannot hold the payload
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Copy into user memory faulted
    #[error("Bad address")]
    BadAddress,

    /// The entry behind an open file has been removed
    #[error("No such device: {0}")]
    NoDevice(String),

    /// Formatted payload did not fit the callback's local buffer
    #[error("Payload exceeds {capacity} byte buffer")]
    PayloadOverflow { capacity: usize },
}

impl KernelError {
    /// Linux errno for this error (positive value)
    pub fn errno(&self) -> i32 {
        match self {
            KernelError::NotFound(_) => 2,
            KernelError::BadAddress => 14,
            KernelError::AlreadyExists(_) => 17,
            KernelError::NoDevice(_) => 19,
            KernelError::InvalidName(_) | KernelError::BufferTooSmall { .. } => 22,
            KernelError::PayloadOverflow { .. } => 75,
        }
    }
}

impl From<UserCopyError> for KernelError {
    fn from(err: UserCopyError) -> Self {
        match err {
            UserCopyError::Fault => KernelError::BadAddress,
            UserCopyError::TooSmall { needed, available } => {
                KernelError::BufferTooSmall { needed, available }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_mapping() {
        assert_eq!(KernelError::NotFound("x".into()).errno(), 2);
        assert_eq!(KernelError::AlreadyExists("x".into()).errno(), 17);
        assert_eq!(KernelError::BadAddress.errno(), 14);
        assert_eq!(KernelError::NoDevice("x".into()).errno(), 19);
        assert_eq!(
            KernelError::BufferTooSmall {
                needed: 2,
                available: 1
            }
            .errno(),
            22
        );
    }

    #[test]
    fn test_from_user_copy_error() {
        assert_eq!(
            KernelError::from(UserCopyError::Fault),
            KernelError::BadAddress
        );
        assert_eq!(
            KernelError::from(UserCopyError::TooSmall {
                needed: 40,
                available: 8
            }),
            KernelError::BufferTooSmall {
                needed: 40,
                available: 8
            }
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            KernelError::NotFound("/proc/jiffies".into()).to_string(),
            "No such file or directory: /proc/jiffies"
        );
    }
}
