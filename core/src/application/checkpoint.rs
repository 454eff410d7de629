//! Checkpoint scan loop.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, sleep_until, Instant};
use tracing::{error, info, warn};

use crate::domain::{GateOutcome, ScanEvent, TokenId, VerificationResponse};
use crate::ports::{
    ActuatorPort, CameraPort, StatusDisplayPort, TokenReaderPort, VerificationPort,
};

use super::feedback;

/// Time the student gets to face the camera after the acknowledgement beep.
pub const POSITIONING_DELAY: Duration = Duration::from_millis(500);

/// Pause between scan cycles.
pub const CYCLE_DELAY: Duration = Duration::from_secs(1);

/// What one scan cycle did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CycleReport {
    /// Token read this cycle, if the reader produced one.
    pub token: Option<TokenId>,
    /// Whether a photo went out with the verification request.
    pub image_attached: bool,
    /// Gate decision, when a token was processed.
    pub outcome: Option<GateOutcome>,
}

/// Application service driving one checkpoint.
///
/// Owns every hardware and network port for the life of the process. The
/// only state carried between cycles is the heartbeat timer.
pub struct CheckpointService<R, C, A, V, D> {
    reader: R,
    camera: C,
    actuator: A,
    verifier: V,
    display: D,
    heartbeat_interval: Duration,
    last_heartbeat: Option<Instant>,
}

impl<R, C, A, V, D> CheckpointService<R, C, A, V, D>
where
    R: TokenReaderPort,
    C: CameraPort,
    A: ActuatorPort,
    V: VerificationPort,
    D: StatusDisplayPort,
{
    pub fn new(
        reader: R,
        camera: C,
        actuator: A,
        verifier: V,
        display: D,
        heartbeat_interval: Duration,
    ) -> Self {
        Self {
            reader,
            camera,
            actuator,
            verifier,
            display,
            heartbeat_interval,
            last_heartbeat: None,
        }
    }

    /// Run until `shutdown` resolves.
    ///
    /// Shutdown is observed while waiting for a token and between cycles.
    /// A scan already being processed finishes first. Heartbeats keep going
    /// while the reader sits idle.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        self.send_heartbeat().await;

        'scan: loop {
            self.heartbeat_if_due().await;
            self.prompt();

            // An idle reader must not starve the heartbeat. Reads are
            // cancel-safe, so the wait restarts after each one.
            let token = loop {
                let heartbeat_at = self.next_heartbeat_at();
                let read = tokio::select! {
                    _ = &mut shutdown => break 'scan,
                    token = self.wait_for_token() => Some(token),
                    _ = sleep_until(heartbeat_at) => None,
                };
                match read {
                    Some(token) => break token,
                    None => self.send_heartbeat().await,
                }
            };

            if let Some(token) = token {
                self.process_token(token).await;
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = sleep(CYCLE_DELAY) => {}
            }
        }

        info!("Checkpoint loop stopped");
    }

    /// One cycle without the trailing delay: heartbeat check, read, process.
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.heartbeat_if_due().await;
        self.prompt();

        match self.wait_for_token().await {
            Some(token) => self.process_token(token).await,
            None => CycleReport::default(),
        }
    }

    /// Report the device online and restart the heartbeat timer.
    ///
    /// Failures are logged and otherwise ignored.
    pub async fn send_heartbeat(&mut self) {
        let ip_address = self.verifier.local_ip().await;
        match self.verifier.send_heartbeat(&ip_address).await {
            Ok(()) => info!(%ip_address, "Heartbeat sent"),
            Err(e) => warn!(error = %e, "Heartbeat failed"),
        }
        self.last_heartbeat = Some(Instant::now());
    }

    /// True before the first heartbeat and once the interval is exceeded.
    pub fn heartbeat_due(&self) -> bool {
        self.last_heartbeat
            .map_or(true, |last| last.elapsed() > self.heartbeat_interval)
    }

    /// When the next heartbeat falls due while waiting for a token.
    fn next_heartbeat_at(&self) -> Instant {
        self.last_heartbeat
            .map_or_else(Instant::now, |last| last + self.heartbeat_interval)
    }

    async fn heartbeat_if_due(&mut self) {
        if self.heartbeat_due() {
            self.send_heartbeat().await;
        }
    }

    fn prompt(&self) {
        self.display.show("");
        self.display.show(&"=".repeat(50));
        self.display.show("Ready to scan. Present ID card...");
    }

    /// Block on the reader. A reader fault is logged and yields `None`.
    pub async fn wait_for_token(&self) -> Option<TokenId> {
        match self.reader.read_token().await {
            Ok(token) => Some(token),
            Err(e) => {
                error!(error = %e, "Error reading token");
                None
            }
        }
    }

    /// Capture, verify and signal the verdict for one token.
    pub async fn process_token(&self, token: TokenId) -> CycleReport {
        self.display.show(&format!("ID Scanned: {}", token));
        feedback::acknowledge(&self.actuator).await;

        self.display.show("Capturing face photo...");
        sleep(POSITIONING_DELAY).await;

        let face_image = match self.camera.capture().await {
            Ok(image) => {
                self.display.show("Photo captured, verifying...");
                Some(image)
            }
            Err(e) => {
                warn!(error = %e, "Face capture failed");
                self.display
                    .show("Warning: No face photo captured, verifying with ID only...");
                None
            }
        };

        let scan = ScanEvent::new(token, face_image);
        let response = match self.verifier.verify_entry(&scan).await {
            Ok(response) => Some(response),
            Err(e) => {
                error!(error = %e, token = %scan.token_id, "Error verifying entry");
                None
            }
        };

        let outcome = self.handle_verification_response(response.as_ref()).await;

        CycleReport {
            image_attached: scan.has_image(),
            token: Some(scan.token_id),
            outcome: Some(outcome),
        }
    }

    /// Show the verdict and run the matching feedback pattern.
    ///
    /// `None` (request failed or unreadable body) gets the denied pattern.
    pub async fn handle_verification_response(
        &self,
        response: Option<&VerificationResponse>,
    ) -> GateOutcome {
        let Some(response) = response else {
            self.display.show("No response from server");
            feedback::denied(&self.actuator).await;
            return GateOutcome::NoResponse;
        };

        if let Some(sms_status) = response.sms_status() {
            self.display.show(sms_status);
        }

        if response.is_granted() {
            let action = response.attendance_action();
            let student_name = response.student_name().to_string();

            self.display
                .show(&format!("{}: {}", action.label(), student_name));
            self.display
                .show(&format!("   Time: {}", response.timestamp_or_empty()));
            info!(student = %student_name, action = action.label(), "Access granted");

            feedback::granted(&self.actuator).await;
            GateOutcome::Granted {
                action,
                student_name,
            }
        } else {
            let message = response.message_or_default().to_string();

            self.display.show(&format!("ACCESS DENIED: {}", message));
            info!(%message, "Access denied");

            feedback::denied(&self.actuator).await;
            GateOutcome::Denied { message }
        }
    }
}
