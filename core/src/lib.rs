//! Checkpoint Core Library
//!
//! Attendance checkpoint agent for a small embedded Linux device.
//! Provides functionality to:
//! - Read RFID/barcode tokens
//! - Capture a face photo and base64-encode it
//! - Submit scans to the attendance service and report liveness
//! - Drive a buzzer and green/red status LEDs
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure business logic and data models
//! - `ports`: Trait definitions (interfaces)
//! - `adapters`: External system implementations
//! - `application`: Use case services
//!
//! # Hardware
//! - Token reader: any line-oriented source (keyboard wedge on stdin, serial tty)
//! - Camera: `libcamera-still` or a compatible capture program
//! - GPIO: Linux sysfs interface

// Hexagonal architecture layers
pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub mod config;
pub mod error;

// Re-export domain types (primary API)
pub use domain::{
    AttendanceAction, CapturedImage, GateOutcome, Led, ScanEvent, TokenId, VerificationResponse,
};

// Re-export other commonly used types
pub use adapters::{
    discover_local_ip, ConsoleDisplay, DisabledCamera, GpioActuator, LineTokenReader,
    LoggingActuator, StillCamera, VerificationClient,
};
pub use application::{CheckpointService, CycleReport};
pub use config::{CameraConfig, ConfigStore, DeviceConfig, PinConfig};
pub use error::{Error, Result};
