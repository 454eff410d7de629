//! Adapters layer - External system implementations.
//!
//! This module contains implementations of the port traits defined in `ports`.
//! Each adapter handles communication with external systems.

pub mod camera;
pub mod console;
pub mod gpio;
pub mod http;
pub mod reader;

// Re-export main types for convenience
pub use camera::{DisabledCamera, StillCamera};
pub use console::{ConsoleDisplay, LoggingActuator};
pub use gpio::GpioActuator;
pub use http::{discover_local_ip, VerificationClient};
pub use reader::LineTokenReader;
