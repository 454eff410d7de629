//! Actuator port (interface).

use std::time::Duration;

use crate::domain::Led;

/// Port for the buzzer and status LEDs.
///
/// Calls are best-effort: implementations log output failures instead of
/// returning them, so feedback never interrupts the scan loop.
pub trait ActuatorPort: Send + Sync {
    /// Sound the buzzer for `duration`, returning once it is silent again.
    fn beep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;

    /// Switch a status LED on or off.
    fn set_led(&self, led: Led, on: bool) -> impl std::future::Future<Output = ()> + Send;
}
