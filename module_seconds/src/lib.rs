//! # Seconds Module
//!
//! Reports whole seconds since load through `/proc/seconds`.
//!
//! ```text
//! $ sleep 3; cat /proc/seconds
//! In proc_read(), the Seconds is: 3
//! ```
//!
//! The baseline tick is captured in `init` and moved into the entry's
//! read side. Elapsed time is `(now - baseline) / HZ`, truncated.

use kernel_api::{Jiffies, KernelError, KernelModule, KernelServices, ModuleHost, ModuleInfo};
use kernel_api::{PayloadBuffer, ProcShow};
use services_logger::LogEntry;
use std::rc::Rc;

/// Entry name under `/proc`
pub const PROC_NAME: &str = "seconds";

const INFO: ModuleInfo = ModuleInfo {
    name: "seconds",
    license: "GPL",
    description: "Seconds Module",
    author: "SGG",
};

/// Read side of `/proc/seconds`
struct SecondsReport {
    baseline: Jiffies,
}

impl ProcShow for SecondsReport {
    fn show(
        &self,
        kernel: &mut dyn KernelServices,
        out: &mut PayloadBuffer,
    ) -> Result<(), KernelError> {
        let now = kernel.jiffies();
        let seconds = now.seconds_since(self.baseline, kernel.hz());
        out.print(format_args!("In proc_read(), the Seconds is: {}\n", seconds))?;
        kernel.printk(
            LogEntry::info(format!("In proc_read(), the Seconds is: {}", seconds))
                .with_field("jiffies", now)
                .with_field("seconds", seconds),
        );
        Ok(())
    }
}

/// The elapsed-time module
#[derive(Debug, Default)]
pub struct SecondsModule {
    baseline: Option<Jiffies>,
}

impl SecondsModule {
    pub fn new() -> Self {
        Self { baseline: None }
    }

    /// Tick count captured at load; `None` while not loaded
    pub fn baseline(&self) -> Option<Jiffies> {
        self.baseline
    }
}

impl KernelModule for SecondsModule {
    fn info(&self) -> ModuleInfo {
        INFO
    }

    fn init(&mut self, host: &mut dyn ModuleHost) -> Result<(), KernelError> {
        let baseline = host.jiffies();
        host.proc_create(PROC_NAME, Rc::new(SecondsReport { baseline }))?;
        self.baseline = Some(baseline);

        host.printk(
            LogEntry::info(format!("/proc/{} created", PROC_NAME)).with_field("baseline", baseline),
        );
        Ok(())
    }

    fn exit(&mut self, host: &mut dyn ModuleHost) {
        if let Err(err) = host.remove_proc_entry(PROC_NAME) {
            host.pr_warn(format!("{}: {}", PROC_NAME, err));
        }
        self.baseline = None;

        let now = host.jiffies();
        host.printk(
            LogEntry::info(format!("In proc_exit(), the Jiffies is: {}", now))
                .with_field("jiffies", now),
        );
        host.pr_info(format!("/proc/{} removed", PROC_NAME));
    }
}
