//! # Host Runtime
//!
//! Runs a host script against a simulated kernel and collects a transcript.

use crate::commands::{HostCommand, HostCommandParser};
use crate::script::{HostScript, HostScriptError, ScriptLine};
use kernel_api::{KernelError, KernelModule};
use module_jiffies::JiffiesModule;
use module_seconds::SecondsModule;
use services_logger::LogEntry;
use sim_kernel::{ConfigError, SimKernelConfig, SimulatedKernel};
use thiserror::Error;

/// Host runtime error types
#[derive(Debug, Error)]
pub enum HostRuntimeError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Script error: {0}")]
    Script(#[from] HostScriptError),
}

/// Why a single command did not complete
///
/// These are recorded in the transcript; they do not stop the run.
#[derive(Debug, Error)]
pub enum CommandFailure {
    #[error("{0}")]
    Parse(String),

    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("{0} (errno {})", .0.errno())]
    Kernel(#[from] KernelError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Host runtime configuration
#[derive(Debug, Clone, Default)]
pub struct HostRuntimeConfig {
    /// Boot parameters for the simulated kernel
    pub kernel: SimKernelConfig,
    /// Script text; `None` runs the built-in demo
    pub script: Option<String>,
    /// Emit `dmesg` as JSON lines instead of rendered text
    pub json_log: bool,
}

/// Builds a fresh instance of a built-in module
pub fn module_by_name(name: &str) -> Option<Box<dyn KernelModule>> {
    match name {
        module_jiffies::PROC_NAME => Some(Box::new(JiffiesModule::new())),
        module_seconds::PROC_NAME => Some(Box::new(SecondsModule::new())),
        _ => None,
    }
}

/// Host runtime
pub struct HostRuntime {
    kernel: SimulatedKernel,
    script: HostScript,
    json_log: bool,
    /// Prompt lines and command output, in order
    transcript: Vec<String>,
    /// Commands that failed
    failures: usize,
    /// Commands executed
    steps: usize,
}

impl HostRuntime {
    /// Creates a new host runtime
    pub fn new(config: HostRuntimeConfig) -> Result<Self, HostRuntimeError> {
        let kernel = SimulatedKernel::from_config(&config.kernel)?;
        let script = match &config.script {
            Some(text) => HostScript::from_text(text)?,
            None => HostScript::demo()?,
        };

        Ok(Self {
            kernel,
            script,
            json_log: config.json_log,
            transcript: Vec::new(),
            failures: 0,
            steps: 0,
        })
    }

    /// Runs the script to completion
    pub fn run(&mut self) {
        while self.step() {}
    }

    /// Executes the next script line
    ///
    /// Returns `false` once the script is exhausted.
    pub fn step(&mut self) -> bool {
        match self.script.next_line() {
            Some(ScriptLine { text, command, .. }) => {
                self.dispatch(&text, Ok(command));
                true
            }
            None => false,
        }
    }

    /// Parses and executes a single command line outside the script
    pub fn execute_command(&mut self, command_text: &str) {
        let command = HostCommandParser::parse(command_text)
            .map_err(|e| CommandFailure::Parse(e.to_string()));
        self.dispatch(command_text.trim(), command)
    }

    fn dispatch(&mut self, text: &str, command: Result<HostCommand, CommandFailure>) {
        self.steps += 1;
        self.transcript.push(format!("$ {}", text));

        match command.and_then(|command| self.execute(&command)) {
            Ok(output) => self.transcript.extend(output),
            Err(failure) => {
                self.failures += 1;
                self.transcript.push(format!("{}: {}", text, failure));
            }
        }
    }

    fn execute(&mut self, command: &HostCommand) -> Result<Vec<String>, CommandFailure> {
        let output = match command {
            HostCommand::Insmod { module } => {
                let instance = module_by_name(module)
                    .ok_or_else(|| CommandFailure::UnknownModule(module.clone()))?;
                self.kernel.insmod(instance)?;
                Vec::new()
            }
            HostCommand::Rmmod { module } => {
                self.kernel.rmmod(module)?;
                Vec::new()
            }
            HostCommand::Cat { path } => {
                let contents = self.kernel.cat(path)?;
                contents.lines().map(str::to_string).collect()
            }
            HostCommand::Sleep { duration } => {
                self.kernel.sleep(*duration);
                Vec::new()
            }
            HostCommand::Tick { ticks } => {
                self.kernel.advance_ticks(*ticks);
                Vec::new()
            }
            HostCommand::ListProc => self.kernel.proc_entries(),
            HostCommand::Lsmod => self
                .kernel
                .lsmod()
                .iter()
                .map(|info| format!("{:<12} {:<6} {}", info.name, info.license, info.description))
                .collect(),
            HostCommand::Dmesg { clear } => self.dmesg(*clear)?,
        };
        Ok(output)
    }

    fn dmesg(&mut self, clear: bool) -> Result<Vec<String>, CommandFailure> {
        if !self.json_log {
            return Ok(if clear {
                self.kernel.dmesg_clear()
            } else {
                self.kernel.dmesg()
            });
        }

        let entries: Vec<LogEntry> = if clear {
            self.kernel.drain_log()
        } else {
            self.kernel.log().entries().cloned().collect()
        };
        entries
            .iter()
            .map(|entry| serde_json::to_string(entry).map_err(CommandFailure::from))
            .collect()
    }

    /// Output collected so far
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Gets a reference to the kernel
    pub fn kernel(&self) -> &SimulatedKernel {
        &self.kernel
    }

    /// Gets a mutable reference to the kernel
    pub fn kernel_mut(&mut self) -> &mut SimulatedKernel {
        &mut self.kernel
    }
}
