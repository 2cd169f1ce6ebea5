//! Command-line arguments

use crate::runtime::HostRuntimeConfig;
use sim_kernel::SimKernelConfig;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Argument and config-file errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing value for {0}")]
    MissingValue(String),

    #[error("Invalid value for {option}: {value}")]
    InvalidValue { option: String, value: String },

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// What the process should do
#[derive(Debug)]
pub enum CliAction {
    Run(HostRuntimeConfig),
    Help,
}

/// Parses `args` (program name first)
///
/// `--config` is applied first, so `--hz` and `--boot-jiffies` override
/// the file regardless of their position.
pub fn parse_args(args: &[String]) -> Result<CliAction, CliError> {
    let mut config = HostRuntimeConfig::default();
    let mut hz = None;
    let mut boot_jiffies = None;
    let mut config_path = None;
    let mut script_path = None;
    let mut i = 1;

    while i < args.len() {
        let option = args[i].as_str();
        match option {
            "--config" | "-c" => config_path = Some(value_for(args, &mut i)?),
            "--script" | "-s" => script_path = Some(value_for(args, &mut i)?),
            "--hz" => hz = Some(parse_number(option, &value_for(args, &mut i)?)?),
            "--boot-jiffies" => {
                boot_jiffies = Some(parse_number(option, &value_for(args, &mut i)?)?)
            }
            "--json-log" => config.json_log = true,
            "--help" | "-h" => return Ok(CliAction::Help),
            other => return Err(CliError::UnknownOption(other.to_string())),
        }
        i += 1;
    }

    if let Some(path) = config_path {
        config.kernel = load_kernel_config(&path)?;
    }
    if let Some(hz) = hz {
        config.kernel.hz = hz;
    }
    if let Some(ticks) = boot_jiffies {
        config.kernel.boot_jiffies = Some(ticks);
    }
    if let Some(path) = script_path {
        config.script = Some(read_file(&path)?);
    }

    Ok(CliAction::Run(config))
}

/// Loads a JSON kernel config; missing fields take their defaults
pub fn load_kernel_config(path: impl AsRef<Path>) -> Result<SimKernelConfig, CliError> {
    let path = path.as_ref();
    let text = read_file(path)?;
    serde_json::from_str(&text).map_err(|source| CliError::Config {
        path: path.display().to_string(),
        source,
    })
}

fn read_file(path: impl AsRef<Path>) -> Result<String, CliError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn value_for(args: &[String], i: &mut usize) -> Result<String, CliError> {
    let option = &args[*i];
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| CliError::MissingValue(option.clone()))
}

fn parse_number<T: std::str::FromStr>(option: &str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::InvalidValue {
        option: option.to_string(),
        value: value.to_string(),
    })
}

/// Usage text for `--help`
pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [OPTIONS]

Options:
  -c, --config <FILE>      Kernel config (JSON: hz, boot_jiffies, log_capacity)
  -s, --script <FILE>      Host script to run (default: built-in demo)
  --hz <N>                 Tick rate
  --boot-jiffies <N>       Counter value at boot
  --json-log               Print dmesg as JSON lines
  -h, --help               Show this help message

Examples:
  {program} --hz 100
  {program} --script demo.procsh --json-log"
    )
}
