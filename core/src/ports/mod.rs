//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with external systems. Implementations live in `adapters`.

mod actuator;
mod camera;
mod display;
mod reader;
mod verifier;

pub use actuator::ActuatorPort;
pub use camera::CameraPort;
pub use display::StatusDisplayPort;
pub use reader::TokenReaderPort;
pub use verifier::VerificationPort;
