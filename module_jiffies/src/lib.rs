//! # Jiffies Module
//!
//! Reports the kernel tick counter through `/proc/jiffies`.
//!
//! ```text
//! $ cat /proc/jiffies
//! In proc_read(), the Jiffies is: 4295554023
//! ```
//!
//! The module holds no state of its own. Each read samples the counter
//! at the moment the payload is formatted.

use kernel_api::{KernelError, KernelModule, KernelServices, ModuleHost, ModuleInfo};
use kernel_api::{PayloadBuffer, ProcShow};
use services_logger::LogEntry;
use std::rc::Rc;

/// Entry name under `/proc`
pub const PROC_NAME: &str = "jiffies";

const INFO: ModuleInfo = ModuleInfo {
    name: "jiffies",
    license: "GPL",
    description: "Jiffies Module",
    author: "SGG",
};

/// Read side of `/proc/jiffies`
struct JiffiesReport;

impl ProcShow for JiffiesReport {
    fn show(
        &self,
        kernel: &mut dyn KernelServices,
        out: &mut PayloadBuffer,
    ) -> Result<(), KernelError> {
        let now = kernel.jiffies();
        out.print(format_args!("In proc_read(), the Jiffies is: {}\n", now))?;
        kernel.printk(
            LogEntry::info(format!("In proc_read(), the Jiffies is: {}", now))
                .with_field("jiffies", now),
        );
        Ok(())
    }
}

/// The counter-report module
#[derive(Debug, Default)]
pub struct JiffiesModule;

impl JiffiesModule {
    pub fn new() -> Self {
        Self
    }
}

impl KernelModule for JiffiesModule {
    fn info(&self) -> ModuleInfo {
        INFO
    }

    fn init(&mut self, host: &mut dyn ModuleHost) -> Result<(), KernelError> {
        host.proc_create(PROC_NAME, Rc::new(JiffiesReport))?;
        host.pr_info(format!("/proc/{} created", PROC_NAME));

        let (now, hz) = (host.jiffies(), host.hz());
        host.printk(
            LogEntry::info(format!(
                "In proc_init(), the Jiffies is: {} and Hz is: {}",
                now, hz
            ))
            .with_field("jiffies", now)
            .with_field("hz", hz),
        );
        Ok(())
    }

    fn exit(&mut self, host: &mut dyn ModuleHost) {
        if let Err(err) = host.remove_proc_entry(PROC_NAME) {
            host.pr_warn(format!("{}: {}", PROC_NAME, err));
        }

        let now = host.jiffies();
        host.printk(
            LogEntry::info(format!("In proc_exit(), the Jiffies is: {}", now))
                .with_field("jiffies", now),
        );
        host.pr_info(format!("/proc/{} removed", PROC_NAME));
    }
}
