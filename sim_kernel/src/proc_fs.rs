//! # Simulated Proc Filesystem
//!
//! Name → entry table for `/proc`, plus the open-file sessions readers
//! hold.
//!
//! The table owns each entry. An open [`ProcFile`] only keeps a weak
//! reference, so removing an entry while a reader still has it open turns
//! that reader's next `read` into `ENODEV` instead of keeping a dead
//! module's callback alive.

use core_types::SessionId;
use kernel_api::proc_fs::{entry_name, proc_path, validate_name};
use kernel_api::{KernelError, OneShot, ProcShow};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// A registered proc entry
pub struct ProcEntry {
    name: String,
    show: Rc<dyn ProcShow>,
}

impl ProcEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn show(&self) -> &dyn ProcShow {
        self.show.as_ref()
    }
}

impl fmt::Debug for ProcEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcEntry")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// An open handle on a proc entry
///
/// Carries its own read-cycle state; see [`OneShot`].
#[derive(Debug)]
pub struct ProcFile {
    session: SessionId,
    path: String,
    entry: Weak<ProcEntry>,
    pub(crate) state: OneShot,
}

impl ProcFile {
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// True when the next read will return end-of-stream
    pub fn at_eof(&self) -> bool {
        self.state.is_completed()
    }

    pub(crate) fn entry(&self) -> Result<Rc<ProcEntry>, KernelError> {
        self.entry
            .upgrade()
            .ok_or_else(|| KernelError::NoDevice(self.path.clone()))
    }
}

/// The `/proc` namespace
#[derive(Default)]
pub struct ProcFs {
    entries: HashMap<String, Rc<ProcEntry>>,
}

impl ProcFs {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers `/proc/<name>`
    pub fn create(&mut self, name: &str, show: Rc<dyn ProcShow>) -> Result<(), KernelError> {
        validate_name(name)?;
        if self.entries.contains_key(name) {
            return Err(KernelError::AlreadyExists(proc_path(name)));
        }
        let entry = ProcEntry {
            name: name.to_string(),
            show,
        };
        self.entries.insert(name.to_string(), Rc::new(entry));
        Ok(())
    }

    /// Deregisters `/proc/<name>`
    pub fn remove(&mut self, name: &str) -> Result<(), KernelError> {
        self.entries
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| KernelError::NotFound(proc_path(name)))
    }

    /// Opens a new session on `/proc/<name>`
    pub fn open(&self, path: &str) -> Result<ProcFile, KernelError> {
        let entry = entry_name(path)
            .and_then(|name| self.entries.get(name))
            .ok_or_else(|| KernelError::NotFound(path.to_string()))?;

        Ok(ProcFile {
            session: SessionId::new(),
            path: path.to_string(),
            entry: Rc::downgrade(entry),
            state: OneShot::new(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entry names, sorted
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ProcFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcFs")
            .field("entries", &self.entries())
            .finish()
    }
}
