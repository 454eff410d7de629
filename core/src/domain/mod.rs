//! Domain layer - Pure business logic and data models.
//!
//! This module contains domain entities that represent core business concepts.
//! These types have no I/O dependencies and can be tested in isolation.

mod hardware;
mod scan;
mod verification;

// Re-export all domain types
pub use hardware::{Led, BEEP_GAP, LED_HOLD, LONG_BEEP, SHORT_BEEP};
pub use scan::{CapturedImage, ScanEvent, TokenId};
pub use verification::{
    AttendanceAction, GateOutcome, StudentInfo, VerificationResponse, ACTION_CHECK_OUT,
    GATE_GRANTED,
};
