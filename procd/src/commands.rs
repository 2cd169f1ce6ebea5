//! # Host Commands
//!
//! The command set a host script is made of.
//!
//! ## Command Set
//!
//! - `insmod <module>` - Load a built-in module (`jiffies`, `seconds`)
//! - `rmmod <module>` - Unload a module
//! - `cat <path>` - Read a `/proc` entry to end-of-stream
//! - `sleep <N>` / `sleep <N>ms` - Advance the clock by wall time
//! - `tick <N>` - Advance the clock by raw ticks
//! - `ls /proc` - List proc entries
//! - `lsmod` - List loaded modules
//! - `dmesg` / `dmesg -c` - Show (and optionally clear) the kernel log

use std::time::Duration;
use thiserror::Error;

/// Host command error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostCommandError {
    #[error("Empty command")]
    Empty,

    #[error("Missing argument for {0}")]
    MissingArgument(String),

    #[error("Unexpected argument for {command}: {argument}")]
    UnexpectedArgument { command: String, argument: String },

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid tick count: {0}")]
    InvalidTicks(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Host commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    Insmod { module: String },
    Rmmod { module: String },
    Cat { path: String },
    Sleep { duration: Duration },
    Tick { ticks: u64 },
    ListProc,
    Lsmod,
    Dmesg { clear: bool },
}

/// Host command parser
pub struct HostCommandParser;

impl HostCommandParser {
    /// Parses a single command line
    pub fn parse(input: &str) -> Result<HostCommand, HostCommandError> {
        let mut words = input.split_whitespace();
        let command = words.next().ok_or(HostCommandError::Empty)?;
        let argument = words.next();

        if let Some(extra) = words.next() {
            return Err(HostCommandError::UnexpectedArgument {
                command: command.to_string(),
                argument: extra.to_string(),
            });
        }

        let required = |arg: Option<&str>| {
            arg.map(str::to_string)
                .ok_or_else(|| HostCommandError::MissingArgument(command.to_string()))
        };

        match command {
            "insmod" => Ok(HostCommand::Insmod {
                module: Self::module_name(&required(argument)?),
            }),
            "rmmod" => Ok(HostCommand::Rmmod {
                module: Self::module_name(&required(argument)?),
            }),
            "cat" => Ok(HostCommand::Cat {
                path: required(argument)?,
            }),
            "sleep" => Ok(HostCommand::Sleep {
                duration: Self::parse_duration(&required(argument)?)?,
            }),
            "tick" => {
                let raw = required(argument)?;
                let ticks = raw
                    .parse()
                    .map_err(|_| HostCommandError::InvalidTicks(raw.clone()))?;
                Ok(HostCommand::Tick { ticks })
            }
            "ls" => match argument {
                None | Some("/proc") | Some("/proc/") => Ok(HostCommand::ListProc),
                Some(other) => Err(HostCommandError::UnexpectedArgument {
                    command: command.to_string(),
                    argument: other.to_string(),
                }),
            },
            "lsmod" => Self::no_argument(command, argument, HostCommand::Lsmod),
            "dmesg" => match argument {
                None => Ok(HostCommand::Dmesg { clear: false }),
                Some("-c") => Ok(HostCommand::Dmesg { clear: true }),
                Some(other) => Err(HostCommandError::UnexpectedArgument {
                    command: command.to_string(),
                    argument: other.to_string(),
                }),
            },
            other => Err(HostCommandError::UnknownCommand(other.to_string())),
        }
    }

    fn no_argument(
        command: &str,
        argument: Option<&str>,
        parsed: HostCommand,
    ) -> Result<HostCommand, HostCommandError> {
        match argument {
            None => Ok(parsed),
            Some(other) => Err(HostCommandError::UnexpectedArgument {
                command: command.to_string(),
                argument: other.to_string(),
            }),
        }
    }

    /// `insmod jiffies.ko` and `insmod jiffies` name the same module
    fn module_name(raw: &str) -> String {
        raw.strip_suffix(".ko").unwrap_or(raw).to_string()
    }

    /// Parses `3`, `3s` or `250ms`
    fn parse_duration(raw: &str) -> Result<Duration, HostCommandError> {
        let invalid = || HostCommandError::InvalidDuration(raw.to_string());

        if let Some(millis) = raw.strip_suffix("ms") {
            return millis
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| invalid());
        }

        raw.strip_suffix('s')
            .unwrap_or(raw)
            .parse()
            .map(Duration::from_secs)
            .map_err(|_| invalid())
    }
}
