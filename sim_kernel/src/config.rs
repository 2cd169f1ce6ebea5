//! Simulated kernel configuration

use hal::Hz;
use kernel_api::Jiffies;
use serde::{Deserialize, Serialize};
use services_logger::DEFAULT_LOG_CAPACITY;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Tick rate must be non-zero")]
    ZeroHz,
}

/// Boot-time parameters of a [`SimulatedKernel`](crate::SimulatedKernel)
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimKernelConfig {
    /// Ticks per second (`CONFIG_HZ`)
    pub hz: u32,
    /// Counter value at boot; `None` means `INITIAL_JIFFIES` for `hz`
    pub boot_jiffies: Option<u64>,
    /// Entries retained by the kernel log
    pub log_capacity: usize,
}

impl SimKernelConfig {
    /// Validated tick rate
    pub fn tick_rate(&self) -> Result<Hz, ConfigError> {
        Hz::new(self.hz).ok_or(ConfigError::ZeroHz)
    }

    /// Counter value the kernel boots with
    pub fn boot(&self) -> Result<Jiffies, ConfigError> {
        let hz = self.tick_rate()?;
        Ok(self
            .boot_jiffies
            .map(Jiffies::new)
            .unwrap_or_else(|| Jiffies::initial(hz)))
    }
}

impl Default for SimKernelConfig {
    fn default() -> Self {
        Self {
            hz: Hz::DEFAULT.get(),
            boot_jiffies: None,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_boots_at_initial_jiffies() {
        let config = SimKernelConfig::default();
        assert_eq!(config.hz, 250);
        assert_eq!(config.boot().unwrap(), Jiffies::new(4_294_892_296));
    }

    #[test]
    fn test_explicit_boot_jiffies() {
        let config = SimKernelConfig {
            boot_jiffies: Some(1000),
            ..SimKernelConfig::default()
        };
        assert_eq!(config.boot().unwrap(), Jiffies::new(1000));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimKernelConfig = serde_json::from_str(r#"{ "hz": 100 }"#).unwrap();
        assert_eq!(config.hz, 100);
        assert_eq!(config.boot_jiffies, None);
        assert_eq!(config.log_capacity, DEFAULT_LOG_CAPACITY);
    }

    #[test]
    fn test_zero_hz_rejected() {
        let config = SimKernelConfig {
            hz: 0,
            ..SimKernelConfig::default()
        };
        assert_eq!(config.tick_rate(), Err(ConfigError::ZeroHz));
        assert_eq!(config.boot(), Err(ConfigError::ZeroHz));
    }
}
