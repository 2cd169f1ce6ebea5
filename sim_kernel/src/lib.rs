//! # Simulated Kernel
//!
//! An in-process host for loadable modules.
//!
//! ## Purpose
//!
//! The simulated kernel lets module code run without a real kernel:
//! - Runs under `cargo test`
//! - Deterministic (the tick counter moves only when told to)
//! - Inspectable (proc table, module table and log are all reachable)
//!
//! ## Philosophy
//!
//! **Testability is a first-class design constraint.**
//!
//! This is not a mock. It implements the same lifecycle a real kernel
//! runs: `insmod` calls `init` with a [`ModuleHost`], readers open
//! `/proc` entries and read until end-of-stream, `rmmod` calls `exit`.

pub mod config;
pub mod modules;
pub mod proc_fs;
pub mod test_utils;
pub mod timer;
pub mod user_buffer;

pub use config::{ConfigError, SimKernelConfig};
pub use proc_fs::{ProcFile, ProcFs};
pub use user_buffer::SimUserBuffer;

use hal::{Hz, TimerDevice, UserBuffer};
use kernel_api::{
    Jiffies, KernelError, KernelModule, KernelServices, ModuleHost, ModuleInfo, ProcShow,
};
use modules::ModuleTable;
use services_logger::{KernelLog, LogEntry};
use std::rc::Rc;
use std::time::Duration;
use timer::SimTimerDevice;

/// Buffer size `cat` reads with
pub const CAT_BUFFER_SIZE: usize = 4096;

/// Clock and log: the part of the kernel read callbacks can reach
#[derive(Debug)]
struct KernelCore {
    timer: SimTimerDevice,
    hz: Hz,
    boot: Jiffies,
    log: KernelLog,
}

impl KernelServices for KernelCore {
    fn jiffies(&mut self) -> Jiffies {
        Jiffies::new(self.timer.poll_ticks())
    }

    fn hz(&self) -> Hz {
        self.hz
    }

    fn printk(&mut self, entry: LogEntry) {
        let now = self.timer.poll_ticks();
        self.log.push(entry.with_jiffies(now));
    }
}

/// What a module's `init`/`exit` is handed
struct ModuleContext<'a> {
    core: &'a mut KernelCore,
    proc_fs: &'a mut ProcFs,
}

impl KernelServices for ModuleContext<'_> {
    fn jiffies(&mut self) -> Jiffies {
        self.core.jiffies()
    }

    fn hz(&self) -> Hz {
        self.core.hz()
    }

    fn printk(&mut self, entry: LogEntry) {
        self.core.printk(entry);
    }
}

impl ModuleHost for ModuleContext<'_> {
    fn proc_create(&mut self, name: &str, show: Rc<dyn ProcShow>) -> Result<(), KernelError> {
        self.proc_fs.create(name, show)
    }

    fn remove_proc_entry(&mut self, name: &str) -> Result<(), KernelError> {
        self.proc_fs.remove(name)
    }
}

/// Simulated kernel state
pub struct SimulatedKernel {
    core: KernelCore,
    proc_fs: ProcFs,
    modules: ModuleTable,
}

impl SimulatedKernel {
    /// Boots with the default configuration (250 Hz, `INITIAL_JIFFIES`)
    pub fn new() -> Self {
        Self::booted_at(Jiffies::initial(Hz::DEFAULT), Hz::DEFAULT)
    }

    /// Boots with the counter at `boot` ticking at `hz`
    pub fn booted_at(boot: Jiffies, hz: Hz) -> Self {
        Self::assemble(boot, hz, KernelLog::default())
    }

    /// Boots from a configuration
    pub fn from_config(config: &SimKernelConfig) -> Result<Self, ConfigError> {
        let hz = config.tick_rate()?;
        let boot = config.boot()?;
        Ok(Self::assemble(boot, hz, KernelLog::new(config.log_capacity)))
    }

    fn assemble(boot: Jiffies, hz: Hz, log: KernelLog) -> Self {
        Self {
            core: KernelCore {
                timer: SimTimerDevice::starting_at(boot.get()),
                hz,
                boot,
                log,
            },
            proc_fs: ProcFs::new(),
            modules: ModuleTable::new(),
        }
    }

    /// Current tick count
    pub fn jiffies(&self) -> Jiffies {
        self.core.timer.now()
    }

    pub fn hz(&self) -> Hz {
        self.core.hz
    }

    /// Tick count the kernel booted with
    pub fn boot_jiffies(&self) -> Jiffies {
        self.core.boot
    }

    /// Advances the tick counter
    pub fn advance_ticks(&mut self, delta: u64) {
        self.core.timer.advance_ticks(delta);
    }

    /// Moves the tick counter forward to `ticks`
    pub fn set_ticks(&mut self, ticks: u64) {
        self.core.timer.set_ticks(ticks);
    }

    /// Advances the counter by the ticks that elapse in `duration`
    pub fn sleep(&mut self, duration: Duration) {
        let ticks = self.core.hz.ticks_in(duration);
        self.advance_ticks(ticks);
    }

    /// Loads a module and runs its `init`
    ///
    /// A module whose `init` fails is not recorded as loaded.
    pub fn insmod(&mut self, mut module: Box<dyn KernelModule>) -> Result<(), KernelError> {
        let info = module.info();
        if self.modules.contains(info.name) {
            return Err(KernelError::AlreadyExists(info.name.to_string()));
        }

        let mut host = ModuleContext {
            core: &mut self.core,
            proc_fs: &mut self.proc_fs,
        };
        if let Err(err) = module.init(&mut host) {
            host.pr_warn(format!(
                "{}: init failed: {} (errno {})",
                info.name,
                err,
                err.errno()
            ));
            return Err(err);
        }

        self.modules.insert(module);
        Ok(())
    }

    /// Runs a loaded module's `exit` and drops it
    pub fn rmmod(&mut self, name: &str) -> Result<(), KernelError> {
        let mut module = self
            .modules
            .remove(name)
            .ok_or_else(|| KernelError::NotFound(name.to_string()))?;

        let mut host = ModuleContext {
            core: &mut self.core,
            proc_fs: &mut self.proc_fs,
        };
        module.exit(&mut host);
        Ok(())
    }

    /// Loaded modules, sorted by name
    pub fn lsmod(&self) -> Vec<ModuleInfo> {
        self.modules.infos()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.modules.contains(name)
    }

    /// Opens a `/proc` path
    pub fn open(&self, path: &str) -> Result<ProcFile, KernelError> {
        self.proc_fs.open(path)
    }

    /// One invocation of the entry's read callback
    ///
    /// Returns the number of bytes placed in `buf`; 0 ends the read cycle.
    pub fn read(
        &mut self,
        file: &mut ProcFile,
        buf: &mut dyn UserBuffer,
    ) -> Result<usize, KernelError> {
        let entry = file.entry()?;
        file.state.read(entry.show(), &mut self.core, buf)
    }

    /// Reads a `/proc` path to end-of-stream on a fresh session
    pub fn cat(&mut self, path: &str) -> Result<String, KernelError> {
        let mut file = self.open(path)?;
        let mut contents = Vec::new();

        loop {
            let mut buf = SimUserBuffer::new(CAT_BUFFER_SIZE);
            if self.read(&mut file, &mut buf)? == 0 {
                return Ok(String::from_utf8_lossy(&contents).into_owned());
            }
            contents.extend_from_slice(buf.as_bytes());
        }
    }

    /// Names registered under `/proc`, sorted
    pub fn proc_entries(&self) -> Vec<String> {
        self.proc_fs.entries()
    }

    pub fn log(&self) -> &KernelLog {
        &self.core.log
    }

    /// Renders the kernel log as dmesg lines
    pub fn dmesg(&self) -> Vec<String> {
        let (boot, hz) = (self.core.boot.get(), self.core.hz);
        self.core
            .log
            .entries()
            .map(|entry| entry.render(boot, hz))
            .collect()
    }

    /// Renders and clears the kernel log (`dmesg -c`)
    pub fn dmesg_clear(&mut self) -> Vec<String> {
        let (boot, hz) = (self.core.boot.get(), self.core.hz);
        self.core
            .log
            .drain()
            .iter()
            .map(|entry| entry.render(boot, hz))
            .collect()
    }

    /// Removes and returns the raw log entries
    pub fn drain_log(&mut self) -> Vec<LogEntry> {
        self.core.log.drain()
    }
}

impl Default for SimulatedKernel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel_api::PayloadBuffer;

    /// Registers `/proc/<name>` printing the tick count
    struct TickModule {
        name: &'static str,
    }

    struct TickShow;

    impl ProcShow for TickShow {
        fn show(
            &self,
            kernel: &mut dyn KernelServices,
            out: &mut PayloadBuffer,
        ) -> Result<(), KernelError> {
            let now = kernel.jiffies();
            out.print(format_args!("{}\n", now))
        }
    }

    impl KernelModule for TickModule {
        fn info(&self) -> ModuleInfo {
            ModuleInfo {
                name: self.name,
                license: "GPL",
                description: "test",
                author: "test",
            }
        }

        fn init(&mut self, host: &mut dyn ModuleHost) -> Result<(), KernelError> {
            host.proc_create(self.name, Rc::new(TickShow))?;
            host.pr_info(format!("{} up", self.name));
            Ok(())
        }

        fn exit(&mut self, host: &mut dyn ModuleHost) {
            if let Err(err) = host.remove_proc_entry(self.name) {
                host.pr_warn(err.to_string());
            }
        }
    }

    fn kernel_at(ticks: u64) -> SimulatedKernel {
        SimulatedKernel::booted_at(Jiffies::new(ticks), Hz::DEFAULT)
    }

    #[test]
    fn test_default_kernel() {
        let kernel = SimulatedKernel::new();
        assert_eq!(kernel.hz().get(), 250);
        assert_eq!(kernel.jiffies(), Jiffies::initial(Hz::DEFAULT));
        assert!(kernel.proc_entries().is_empty());
        assert!(kernel.lsmod().is_empty());
    }

    #[test]
    fn test_insmod_registers_and_logs() {
        let mut kernel = kernel_at(100);
        kernel.insmod(Box::new(TickModule { name: "tick" })).unwrap();

        assert!(kernel.is_loaded("tick"));
        assert_eq!(kernel.proc_entries(), vec!["tick"]);
        assert_eq!(kernel.log().messages(), vec!["tick up"]);
        assert_eq!(kernel.log().entries().next().unwrap().jiffies, 100);
    }

    #[test]
    fn test_insmod_twice_rejected() {
        let mut kernel = kernel_at(0);
        kernel.insmod(Box::new(TickModule { name: "tick" })).unwrap();
        assert_eq!(
            kernel.insmod(Box::new(TickModule { name: "tick" })),
            Err(KernelError::AlreadyExists("tick".to_string()))
        );
        assert_eq!(kernel.lsmod().len(), 1);
    }

    #[test]
    fn test_failed_init_not_loaded() {
        let mut kernel = kernel_at(0);
        let err = kernel
            .insmod(Box::new(TickModule { name: "a/b" }))
            .unwrap_err();

        assert!(matches!(err, KernelError::InvalidName(_)));
        assert!(!kernel.is_loaded("a/b"));
        assert!(kernel.log().messages()[0].starts_with("a/b: init failed"));
    }

    #[test]
    fn test_rmmod_unknown() {
        let mut kernel = kernel_at(0);
        assert_eq!(
            kernel.rmmod("ghost"),
            Err(KernelError::NotFound("ghost".to_string()))
        );
    }

    #[test]
    fn test_read_cycle_on_session() {
        let mut kernel = kernel_at(500);
        kernel.insmod(Box::new(TickModule { name: "tick" })).unwrap();
        let mut file = kernel.open("/proc/tick").unwrap();
        let mut buf = SimUserBuffer::new(64);

        assert_eq!(kernel.read(&mut file, &mut buf).unwrap(), 4);
        assert_eq!(buf.as_text(), "500\n");
        assert!(file.at_eof());
        assert_eq!(kernel.read(&mut file, &mut buf).unwrap(), 0);
        kernel.advance_ticks(1);
        assert_eq!(kernel.read(&mut file, &mut buf).unwrap(), 4);
        assert_eq!(buf.as_text(), "501\n");
    }

    #[test]
    fn test_read_after_rmmod_is_no_device() {
        let mut kernel = kernel_at(0);
        kernel.insmod(Box::new(TickModule { name: "tick" })).unwrap();
        let mut file = kernel.open("/proc/tick").unwrap();
        kernel.rmmod("tick").unwrap();

        let mut buf = SimUserBuffer::new(64);
        assert_eq!(
            kernel.read(&mut file, &mut buf),
            Err(KernelError::NoDevice("/proc/tick".to_string()))
        );
        assert_eq!(
            kernel.open("/proc/tick").unwrap_err(),
            KernelError::NotFound("/proc/tick".to_string())
        );
    }

    #[test]
    fn test_cat_reads_to_eof() {
        let mut kernel = kernel_at(42);
        kernel.insmod(Box::new(TickModule { name: "tick" })).unwrap();
        assert_eq!(kernel.cat("/proc/tick").unwrap(), "42\n");
        assert_eq!(kernel.cat("/proc/tick").unwrap(), "42\n");
    }

    #[test]
    fn test_sleep_advances_by_hz() {
        let mut kernel = kernel_at(1000);
        kernel.sleep(Duration::from_secs(3));
        assert_eq!(kernel.jiffies(), Jiffies::new(1750));
    }

    #[test]
    fn test_dmesg_and_clear() {
        let mut kernel = kernel_at(1000);
        kernel.advance_ticks(250);
        kernel.insmod(Box::new(TickModule { name: "tick" })).unwrap();

        assert_eq!(kernel.dmesg(), vec!["[    1.000000] tick up"]);
        assert_eq!(kernel.dmesg_clear(), vec!["[    1.000000] tick up"]);
        assert!(kernel.dmesg().is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = SimKernelConfig {
            hz: 100,
            boot_jiffies: Some(5),
            log_capacity: 2,
        };
        let kernel = SimulatedKernel::from_config(&config).unwrap();
        assert_eq!(kernel.hz().get(), 100);
        assert_eq!(kernel.jiffies(), Jiffies::new(5));
        assert_eq!(kernel.log().capacity(), 2);

        let bad = SimKernelConfig {
            hz: 0,
            ..config
        };
        assert!(matches!(
            SimulatedKernel::from_config(&bad),
            Err(ConfigError::ZeroHz)
        ));
    }
}
