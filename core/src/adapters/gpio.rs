//! Buzzer and LED driver over the Linux sysfs GPIO interface.
//!
//! Lines are exported and configured as outputs when the actuator is
//! acquired, and driven low and unexported when it is dropped. Dropping is
//! the single release point, so every exit path of the agent releases them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;
use tracing::{debug, warn};

use crate::config::PinConfig;
use crate::domain::Led;
use crate::error::{Error, Result};
use crate::ports::ActuatorPort;

/// Attempts to configure a freshly exported line while udev fixes permissions.
const SETUP_ATTEMPTS: u32 = 10;
const SETUP_RETRY_DELAY: Duration = Duration::from_millis(20);

/// Owns the buzzer and LED output lines for the lifetime of the agent.
#[derive(Debug)]
pub struct GpioActuator {
    root: PathBuf,
    pins: PinConfig,
}

impl GpioActuator {
    /// Export and configure the buzzer, green and red lines as low outputs.
    pub async fn acquire(root: impl Into<PathBuf>, pins: PinConfig) -> Result<Self> {
        let actuator = Self {
            root: root.into(),
            pins,
        };

        for pin in actuator.lines() {
            actuator.setup_line(pin).await?;
        }

        debug!(
            buzzer = pins.buzzer,
            green = pins.green_led,
            red = pins.red_led,
            "GPIO lines acquired"
        );
        Ok(actuator)
    }

    fn lines(&self) -> [u32; 3] {
        [self.pins.buzzer, self.pins.green_led, self.pins.red_led]
    }

    fn line_dir(&self, pin: u32) -> PathBuf {
        self.root.join(format!("gpio{}", pin))
    }

    fn led_pin(&self, led: Led) -> u32 {
        match led {
            Led::Green => self.pins.green_led,
            Led::Red => self.pins.red_led,
        }
    }

    async fn setup_line(&self, pin: u32) -> Result<()> {
        let line_dir = self.line_dir(pin);

        if !fs::try_exists(&line_dir).await.unwrap_or(false) {
            fs::write(self.root.join("export"), pin.to_string())
                .await
                .map_err(|e| Error::Gpio(format!("Failed to export GPIO {}: {}", pin, e)))?;
        }

        let mut attempt = 1;
        loop {
            match fs::write(line_dir.join("direction"), "out").await {
                Ok(()) => break,
                Err(e) if attempt >= SETUP_ATTEMPTS => {
                    return Err(Error::Gpio(format!(
                        "Failed to configure GPIO {} as output: {}",
                        pin, e
                    )));
                }
                Err(_) => {
                    attempt += 1;
                    tokio::time::sleep(SETUP_RETRY_DELAY).await;
                }
            }
        }

        self.write_line(pin, false).await
    }

    async fn write_line(&self, pin: u32, high: bool) -> Result<()> {
        let value = if high { "1" } else { "0" };
        fs::write(self.line_dir(pin).join("value"), value)
            .await
            .map_err(|e| Error::Gpio(format!("Failed to set GPIO {}: {}", pin, e)))
    }

    async fn drive(&self, pin: u32, high: bool) {
        if let Err(e) = self.write_line(pin, high).await {
            warn!(error = %e, "GPIO write failed");
        }
    }

    /// Sysfs root these lines live under.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ActuatorPort for GpioActuator {
    async fn beep(&self, duration: Duration) {
        self.drive(self.pins.buzzer, true).await;
        tokio::time::sleep(duration).await;
        self.drive(self.pins.buzzer, false).await;
    }

    async fn set_led(&self, led: Led, on: bool) {
        self.drive(self.led_pin(led), on).await;
    }
}

impl Drop for GpioActuator {
    fn drop(&mut self) {
        // Runs outside async context, so plain blocking writes.
        for pin in self.lines() {
            if let Err(e) = std::fs::write(self.line_dir(pin).join("value"), "0") {
                debug!(pin, error = %e, "Failed to drive GPIO low");
            }
            if let Err(e) = std::fs::write(self.root.join("unexport"), pin.to_string()) {
                debug!(pin, error = %e, "Failed to unexport GPIO");
            }
        }
        debug!("GPIO lines released");
    }
}
