//! Loadable module contract

use crate::{KernelError, ModuleHost};
use serde::Serialize;

/// Static metadata a module declares about itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    /// Name used by `insmod`/`rmmod`
    pub name: &'static str,
    pub license: &'static str,
    pub description: &'static str,
    pub author: &'static str,
}

/// A loadable kernel module
///
/// The host calls [`init`](KernelModule::init) once on load and
/// [`exit`](KernelModule::exit) once on unload. Module state lives in the
/// implementing value, never in globals.
pub trait KernelModule {
    /// Static metadata
    fn info(&self) -> ModuleInfo;

    /// Called on load. An error aborts the load.
    fn init(&mut self, host: &mut dyn ModuleHost) -> Result<(), KernelError>;

    /// Called on unload. Unload cannot fail.
    fn exit(&mut self, host: &mut dyn ModuleHost);
}
