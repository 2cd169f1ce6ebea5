//! Host services available to module code

use crate::proc_fs::ProcShow;
use crate::{Jiffies, KernelError};
use hal::Hz;
use services_logger::{LogEntry, LogLevel};
use std::rc::Rc;

/// Services every module callback can use
///
/// This is what a read callback sees: the clock and the log. It cannot
/// create or remove proc entries.
///
/// # Example
///
/// ```
/// use kernel_api::KernelServices;
///
/// fn report<K: KernelServices + ?Sized>(kernel: &mut K) {
///     let now = kernel.jiffies();
///     kernel.pr_info(format!("tick {}", now));
/// }
/// ```
pub trait KernelServices {
    /// Current value of the tick counter
    fn jiffies(&mut self) -> Jiffies;

    /// Tick rate
    fn hz(&self) -> Hz;

    /// Appends an entry to the kernel log
    ///
    /// The host stamps the entry with the current tick count.
    fn printk(&mut self, entry: LogEntry);

    /// Logs a message at Info level
    fn pr_info(&mut self, message: String) {
        self.printk(LogEntry::new(LogLevel::Info, message));
    }

    /// Logs a message at Warn level
    fn pr_warn(&mut self, message: String) {
        self.printk(LogEntry::new(LogLevel::Warn, message));
    }
}

/// Services available during module load and unload
///
/// Extends [`KernelServices`] with proc entry registration. Only the
/// lifecycle callbacks receive a `ModuleHost`.
pub trait ModuleHost: KernelServices {
    /// Registers `/proc/<name>`, served by `show`
    fn proc_create(&mut self, name: &str, show: Rc<dyn ProcShow>) -> Result<(), KernelError>;

    /// Deregisters `/proc/<name>`
    fn remove_proc_entry(&mut self, name: &str) -> Result<(), KernelError>;
}
