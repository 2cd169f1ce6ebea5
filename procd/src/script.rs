//! # Host Script Parser
//!
//! A line-based script of host commands for deterministic runs and demos.
//!
//! ## Format
//!
//! - One command per line (see [`crate::commands`])
//! - Comments: `# ...`, whole-line or trailing
//! - Blank lines are skipped
//!
//! ## Example
//!
//! ```text
//! insmod seconds
//! sleep 3          # let three seconds pass
//! cat /proc/seconds
//! rmmod seconds
//! dmesg -c
//! ```

use crate::commands::{HostCommand, HostCommandParser};
use std::collections::VecDeque;
use thiserror::Error;

/// Script run when no script is given
pub const DEFAULT_SCRIPT: &str = "\
# jiffies: report the tick counter
insmod jiffies
cat /proc/jiffies
rmmod jiffies
dmesg -c

# seconds: report time since load
insmod seconds
sleep 3
cat /proc/seconds
sleep 3
cat /proc/seconds
rmmod seconds
dmesg -c
";

/// Host script error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostScriptError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Empty script")]
    EmptyScript,
}

/// One parsed script line, with the text it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub text: String,
    pub command: HostCommand,
}

/// Host script
#[derive(Debug, Clone)]
pub struct HostScript {
    lines: VecDeque<ScriptLine>,
}

impl HostScript {
    /// Parses a script from text
    pub fn from_text(text: &str) -> Result<Self, HostScriptError> {
        let mut lines = VecDeque::new();

        for (index, raw) in text.lines().enumerate() {
            let line = Self::strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            let command =
                HostCommandParser::parse(line).map_err(|e| HostScriptError::ParseError {
                    line: index + 1,
                    message: e.to_string(),
                })?;
            lines.push_back(ScriptLine {
                line: index + 1,
                text: line.to_string(),
                command,
            });
        }

        if lines.is_empty() {
            return Err(HostScriptError::EmptyScript);
        }

        Ok(Self { lines })
    }

    /// The built-in demo script
    pub fn demo() -> Result<Self, HostScriptError> {
        Self::from_text(DEFAULT_SCRIPT)
    }

    fn strip_comment(line: &str) -> &str {
        match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        }
    }

    /// Takes the next line to execute
    pub fn next_line(&mut self) -> Option<ScriptLine> {
        self.lines.pop_front()
    }

    pub fn has_more(&self) -> bool {
        !self.lines.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}
