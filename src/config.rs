use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "PADBRIDGE_CONFIG";

/// Loopback port the handheld sender targets.
pub const DEFAULT_PORT: u16 = 9876;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Local address the datagram listener binds to.
    pub listen_addr: SocketAddr,
    /// Largest datagram payload read in one receive, in bytes.
    pub receive_buffer_size: usize,
    /// How often a blocked receive wakes up to check for a stop request.
    pub poll_interval_ms: u64,
    /// Device name reported by the virtual controller (uinput only).
    pub controller_name: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            receive_buffer_size: 8192,
            poll_interval_ms: 250,
            controller_name: "padbridge virtual gamepad".into(),
        }
    }
}

impl BridgeConfig {
    fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        Some(dirs::config_dir()?.join("padbridge").join("config.json"))
    }

    /// Load the config from its default location, writing the defaults out on first run.
    ///
    /// A missing config location is not fatal; an existing but invalid file is.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("Cannot find config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            match config.save_to(path) {
                Ok(()) => log::info!("Wrote default config to {}", path.display()),
                Err(e) => log::warn!(
                    "Could not write default config to {} ({}), using defaults",
                    path.display(),
                    e
                ),
            }
            return Ok(config);
        }
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.receive_buffer_size == 0 {
            return Err(BridgeError::Config(
                "receive_buffer_size must be greater than zero".into(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(BridgeError::Config(
                "poll_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
