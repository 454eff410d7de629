//! Console adapters for running without the checkpoint hardware.

use std::time::Duration;

use tracing::info;

use crate::domain::Led;
use crate::ports::{ActuatorPort, StatusDisplayPort};

/// Prints status lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleDisplay;

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self
    }
}

impl StatusDisplayPort for ConsoleDisplay {
    fn show(&self, line: &str) {
        println!("{}", line);
    }
}

/// Stands in for the buzzer and LEDs by logging each signal.
///
/// Beeps still take their full duration so feedback timing matches the device.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingActuator;

impl LoggingActuator {
    pub fn new() -> Self {
        Self
    }
}

impl ActuatorPort for LoggingActuator {
    async fn beep(&self, duration: Duration) {
        info!(duration_ms = duration.as_millis() as u64, "Buzzer");
        tokio::time::sleep(duration).await;
    }

    async fn set_led(&self, led: Led, on: bool) {
        info!(led = led.as_str(), on, "LED");
    }
}
