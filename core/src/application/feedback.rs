//! Buzzer/LED feedback patterns.

use tokio::time::sleep;

use crate::domain::{Led, BEEP_GAP, LED_HOLD, LONG_BEEP, SHORT_BEEP};
use crate::ports::ActuatorPort;

/// Single short beep confirming a token was read.
pub async fn acknowledge<A: ActuatorPort>(actuator: &A) {
    actuator.beep(SHORT_BEEP).await;
}

/// Green on, two short beeps, hold, green off.
pub async fn granted<A: ActuatorPort>(actuator: &A) {
    actuator.set_led(Led::Green, true).await;
    actuator.beep(SHORT_BEEP).await;
    sleep(BEEP_GAP).await;
    actuator.beep(SHORT_BEEP).await;
    sleep(LED_HOLD).await;
    actuator.set_led(Led::Green, false).await;
}

/// Red on, one long beep, hold, red off. Used for denials and errors alike.
pub async fn denied<A: ActuatorPort>(actuator: &A) {
    actuator.set_led(Led::Red, true).await;
    actuator.beep(LONG_BEEP).await;
    sleep(LED_HOLD).await;
    actuator.set_led(Led::Red, false).await;
}
