//! Actuator vocabulary shared by ports and adapters.

use std::time::Duration;

/// Status LED colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Led {
    /// Access granted.
    Green,
    /// Access denied or error.
    Red,
}

impl Led {
    pub fn as_str(&self) -> &'static str {
        match self {
            Led::Green => "green",
            Led::Red => "red",
        }
    }
}

/// Acknowledgement beep after a token is read, and each beep of the granted pattern.
pub const SHORT_BEEP: Duration = Duration::from_millis(100);

/// Gap between the two granted beeps.
pub const BEEP_GAP: Duration = Duration::from_millis(100);

/// Single beep of the denied/error pattern.
pub const LONG_BEEP: Duration = Duration::from_millis(500);

/// How long a status LED stays lit after its beeps.
pub const LED_HOLD: Duration = Duration::from_secs(2);
