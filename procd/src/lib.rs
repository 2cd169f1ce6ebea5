//! # procd Host Runtime
//!
//! Drives the `jiffies` and `seconds` modules inside a simulated kernel.
//!
//! ## Philosophy
//!
//! - **Host owns I/O**: Modules only log; the host prints
//! - **Scripts are explicit**: Every clock move is a script line
//! - **Deterministic mode is the only mode**: Same script, same transcript
//! - **Failures are output**: A failing command is recorded, the run goes on
//!
//! ## Responsibilities
//!
//! The host runtime:
//! - Boots a simulated kernel from config or arguments
//! - Loads and unloads built-in modules by name
//! - Reads `/proc` entries the way `cat` does
//! - Shows the kernel log the way `dmesg` does
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Load modules from disk
//! - Provide a shell with pipes or job control
//! - Run in real time

pub mod cli;
pub mod commands;
pub mod runtime;
pub mod script;

pub use cli::{load_kernel_config, parse_args, usage, CliAction, CliError};
pub use commands::{HostCommand, HostCommandError, HostCommandParser};
pub use runtime::{module_by_name, CommandFailure, HostRuntime, HostRuntimeConfig, HostRuntimeError};
pub use script::{HostScript, HostScriptError, ScriptLine, DEFAULT_SCRIPT};
