//! # Hardware Abstraction Layer (HAL)
//!
//! The primitives a loadable module consumes from its host.
//!
//! ## Philosophy
//!
//! **Host services are traits, not globals.**
//!
//! A module asks for the tick count, the tick rate and a place to copy its
//! output. Real hardware, a simulated kernel or a test double can stand
//! behind each of these.
//!
//! ## Design Principles
//!
//! 1. **Trait-based**: Every host service goes through a trait
//! 2. **All-or-nothing copies**: A user copy either lands whole or fails
//! 3. **Testable**: Everything here can be mocked

pub mod timer;
pub mod user_memory;

pub use timer::{Hz, TimerDevice};
pub use user_memory::{SliceBuffer, UserBuffer, UserCopyError};
