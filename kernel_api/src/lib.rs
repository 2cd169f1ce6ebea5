//! # Kernel API
//!
//! The contract between a loadable module and the kernel hosting it.
//!
//! ## Philosophy
//!
//! The kernel provides **mechanisms**, modules provide content:
//! - Proc entry registration (the kernel owns the namespace)
//! - Read sessions (the kernel owns the read-cycle state)
//! - Time (explicit, handed to the module, never read from a global)
//! - Logging (structured entries, stamped by the kernel)
//!
//! ## Design Goals
//!
//! 1. **Testability**: Every host service is a trait and can be simulated
//! 2. **Explicitness**: Module state is a value passed to callbacks
//! 3. **Bounded output**: Payloads are formatted into a fixed buffer with
//!    overflow checked, not assumed impossible

pub mod error;
pub mod kernel;
pub mod module;
pub mod proc_fs;
pub mod time;

pub use error::KernelError;
pub use kernel::{KernelServices, ModuleHost};
pub use module::{KernelModule, ModuleInfo};
pub use proc_fs::{OneShot, PayloadBuffer, ProcShow, PAYLOAD_BUFFER_SIZE, PROC_ROOT};
pub use time::Jiffies;
