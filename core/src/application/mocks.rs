//! In-memory port implementations for service tests.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::domain::{CapturedImage, Led, ScanEvent, TokenId, VerificationResponse};
use crate::error::{Error, Result};
use crate::ports::{
    ActuatorPort, CameraPort, StatusDisplayPort, TokenReaderPort, VerificationPort,
};

/// Hands out queued reads, then waits forever like an idle reader.
#[derive(Default)]
pub struct MockReader {
    reads: Mutex<VecDeque<Result<TokenId>>>,
    calls: Mutex<usize>,
    fault_when_empty: bool,
}

impl MockReader {
    pub fn with_tokens(tokens: &[&str]) -> Self {
        Self {
            reads: Mutex::new(
                tokens
                    .iter()
                    .map(|t| Ok(TokenId::parse(t).unwrap()))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    /// Reader whose every read is a hardware fault.
    pub fn faulty() -> Self {
        Self {
            fault_when_empty: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

impl TokenReaderPort for MockReader {
    async fn read_token(&self) -> Result<TokenId> {
        *self.calls.lock() += 1;
        let next = self.reads.lock().pop_front();
        match next {
            Some(read) => read,
            None if self.fault_when_empty => Err(Error::Sensor("reader unplugged".to_string())),
            None => std::future::pending().await,
        }
    }
}

pub struct MockCamera {
    working: bool,
    captures: Mutex<usize>,
}

impl MockCamera {
    pub fn working() -> Self {
        Self {
            working: true,
            captures: Mutex::new(0),
        }
    }

    pub fn broken() -> Self {
        Self {
            working: false,
            captures: Mutex::new(0),
        }
    }

    pub fn captures(&self) -> usize {
        *self.captures.lock()
    }
}

impl CameraPort for MockCamera {
    async fn capture(&self) -> Result<CapturedImage> {
        *self.captures.lock() += 1;
        if self.working {
            Ok(CapturedImage::from_base64("SlBFRw==".to_string()))
        } else {
            Err(Error::Camera("no cameras available".to_string()))
        }
    }
}

/// Round to the nearest millisecond; the paused clock can land a hair past a deadline.
pub fn round_ms(d: Duration) -> Duration {
    Duration::from_millis(((d.as_micros() + 500) / 1000) as u64)
}

/// Actuator call with its offset from the recorder's creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Led { at: Duration, led: Led, on: bool },
    Beep { at: Duration, duration: Duration },
}

pub struct RecordingActuator {
    origin: Mutex<Instant>,
    signals: Mutex<Vec<Signal>>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self {
            origin: Mutex::new(Instant::now()),
            signals: Mutex::new(Vec::new()),
        }
    }

    /// Forget earlier signals and measure from now.
    pub fn reset(&self) {
        *self.origin.lock() = Instant::now();
        self.signals.lock().clear();
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.signals.lock().clone()
    }

    fn elapsed(&self) -> Duration {
        round_ms(self.origin.lock().elapsed())
    }
}

impl ActuatorPort for RecordingActuator {
    async fn beep(&self, duration: Duration) {
        let at = self.elapsed();
        self.signals.lock().push(Signal::Beep { at, duration });
        tokio::time::sleep(duration).await;
    }

    async fn set_led(&self, led: Led, on: bool) {
        let at = self.elapsed();
        self.signals.lock().push(Signal::Led { at, led, on });
    }
}

/// Replays queued verdicts; `None` entries simulate a failed request.
#[derive(Default)]
pub struct MockVerifier {
    responses: Mutex<VecDeque<Option<VerificationResponse>>>,
    scans: Mutex<Vec<ScanEvent>>,
    heartbeats: Mutex<Vec<String>>,
    heartbeat_fails: bool,
}

impl MockVerifier {
    pub fn replying(responses: Vec<Option<VerificationResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    /// Verifier whose heartbeat endpoint always answers 503.
    pub fn failing_heartbeats() -> Self {
        Self {
            heartbeat_fails: true,
            ..Default::default()
        }
    }

    pub fn scans(&self) -> Vec<ScanEvent> {
        self.scans.lock().clone()
    }

    pub fn heartbeat_count(&self) -> usize {
        self.heartbeats.lock().len()
    }
}

impl VerificationPort for MockVerifier {
    async fn send_heartbeat(&self, ip_address: &str) -> Result<()> {
        self.heartbeats.lock().push(ip_address.to_string());
        if self.heartbeat_fails {
            return Err(Error::Status {
                endpoint: "heartbeat.php".to_string(),
                status: 503,
            });
        }
        Ok(())
    }

    async fn verify_entry(&self, scan: &ScanEvent) -> Result<VerificationResponse> {
        self.scans.lock().push(scan.clone());
        match self.responses.lock().pop_front().flatten() {
            Some(response) => Ok(response),
            None => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
        }
    }

    async fn local_ip(&self) -> String {
        "192.168.1.50".to_string()
    }
}

#[derive(Default)]
pub struct RecordingDisplay {
    lines: Mutex<Vec<String>>,
}

impl RecordingDisplay {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|line| line.contains(needle))
    }
}

impl StatusDisplayPort for RecordingDisplay {
    fn show(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}
