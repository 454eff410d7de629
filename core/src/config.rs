//! Device configuration.
//!
//! Every value has a built-in default, so the agent runs without any file.
//! An optional JSON file (default `~/.checkpoint-agent/config.json`) can
//! override individual keys. The configuration is read once at startup and
//! never reloaded.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

/// Immutable device configuration, passed explicitly to each component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceConfig {
    /// Base URL of the attendance API, without the endpoint file name.
    pub api_base_url: String,

    /// Value sent in the `X-API-Key` header.
    pub api_key: String,

    /// Identifier of this checkpoint.
    pub device_id: String,

    /// BCM pin numbers for the buzzer and LEDs.
    pub pins: PinConfig,

    /// Still camera settings.
    pub camera: CameraConfig,

    /// Seconds between heartbeats.
    pub heartbeat_interval_secs: u64,

    /// Heartbeat request deadline in seconds.
    pub heartbeat_timeout_secs: u64,

    /// Verification request deadline in seconds.
    pub verify_timeout_secs: u64,

    /// Text device the token reader writes to. `None` reads stdin.
    pub reader_device: Option<PathBuf>,

    /// Root of the sysfs GPIO tree.
    pub gpio_root: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://your-server-url.com/api".to_string(),
            api_key: "mabini_device_001_key_2025".to_string(),
            device_id: "DEVICE001".to_string(),
            pins: PinConfig::default(),
            camera: CameraConfig::default(),
            heartbeat_interval_secs: 60,
            heartbeat_timeout_secs: 5,
            verify_timeout_secs: 10,
            reader_device: None,
            gpio_root: PathBuf::from("/sys/class/gpio"),
        }
    }
}

/// GPIO pin assignment (BCM numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PinConfig {
    pub buzzer: u32,
    pub green_led: u32,
    pub red_led: u32,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            buzzer: 18,
            green_led: 23,
            red_led: 24,
        }
    }
}

/// Still camera settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,

    /// Capture program; must accept `--width`, `--height` and `-o <file>`.
    pub command: String,

    /// Arguments placed before the standard ones (e.g. `--rotation 180`).
    pub extra_args: Vec<String>,

    /// Where temporary frames are written.
    pub capture_dir: PathBuf,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            command: "libcamera-still".to_string(),
            extra_args: Vec::new(),
            capture_dir: PathBuf::from("/tmp"),
        }
    }
}

impl DeviceConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_secs(self.heartbeat_timeout_secs)
    }

    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs)
    }

    /// Check values that would otherwise only fail at the first scan.
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(Error::Config("apiBaseUrl must not be empty".to_string()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::Config(format!(
                "apiBaseUrl must start with http:// or https://, got {}",
                url
            )));
        }
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("apiKey must not be empty".to_string()));
        }

        let PinConfig {
            buzzer,
            green_led,
            red_led,
        } = self.pins;
        if buzzer == green_led || buzzer == red_led || green_led == red_led {
            return Err(Error::Config(format!(
                "GPIO pins must be distinct (buzzer {}, green {}, red {})",
                buzzer, green_led, red_led
            )));
        }

        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(Error::Config(format!(
                "Invalid camera resolution {}x{}",
                self.camera.width, self.camera.height
            )));
        }
        if self.camera.command.trim().is_empty() {
            return Err(Error::Config("camera.command must not be empty".to_string()));
        }

        for (name, value) in [
            ("heartbeatIntervalSecs", self.heartbeat_interval_secs),
            ("heartbeatTimeoutSecs", self.heartbeat_timeout_secs),
            ("verifyTimeoutSecs", self.verify_timeout_secs),
        ] {
            if value == 0 {
                return Err(Error::Config(format!("{} must be greater than zero", name)));
            }
        }

        Ok(())
    }
}

/// Reads and writes the JSON configuration file.
pub struct ConfigStore {
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a config store with the default path.
    ///
    /// Default path: `~/.checkpoint-agent/config.json`
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

        Ok(Self {
            config_path: home.join(".checkpoint-agent").join("config.json"),
        })
    }

    /// Create a config store with a custom path.
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load and validate the configuration.
    ///
    /// Returns the built-in defaults if the file doesn't exist.
    pub async fn load(&self) -> Result<DeviceConfig> {
        let config = if fs::try_exists(&self.config_path).await? {
            let content = fs::read_to_string(&self.config_path)
                .await
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

            serde_json::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?
        } else {
            DeviceConfig::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub async fn save(&self, config: &DeviceConfig) -> Result<()> {
        if let Some(config_dir) = self.config_path.parent() {
            fs::create_dir_all(config_dir)
                .await
                .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        // Write atomically by writing to temp file then renaming
        let temp_path = self.config_path.with_extension("json.tmp");

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to create temp config file: {}", e)))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        file.sync_all()
            .await
            .map_err(|e| Error::Config(format!("Failed to sync config: {}", e)))?;

        fs::rename(&temp_path, &self.config_path)
            .await
            .map_err(|e| Error::Config(format!("Failed to rename config file: {}", e)))?;

        Ok(())
    }
}
