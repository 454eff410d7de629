//! Still camera adapter.
//!
//! Runs a capture program (`libcamera-still` by default) that writes one JPEG
//! frame to a timestamp-named file, reads it back and base64-encodes it.
//! The program is spawned per capture, so no camera handle outlives a scan.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use base64::prelude::*;
use chrono::{DateTime, Local};
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

use crate::config::CameraConfig;
use crate::domain::CapturedImage;
use crate::error::{Error, Result};
use crate::ports::CameraPort;

/// Upper bound for one capture, including sensor warm-up.
const CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

/// Captures stills by invoking an external program.
pub struct StillCamera {
    config: CameraConfig,
    timeout: Duration,
}

impl StillCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            timeout: CAPTURE_TIMEOUT,
        }
    }

    /// Override the capture deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Temporary file for a frame taken at `now`.
    pub fn frame_path(&self, now: DateTime<Local>) -> PathBuf {
        self.config
            .capture_dir
            .join(format!("face_{}.jpg", now.format("%Y%m%d_%H%M%S")))
    }

    async fn capture_to(&self, path: &Path) -> Result<CapturedImage> {
        let program = &self.config.command;
        let mut command = Command::new(program);
        command
            .args(&self.config.extra_args)
            .args(["-n", "-t", "1"])
            .arg("--width")
            .arg(self.config.width.to_string())
            .arg("--height")
            .arg(self.config.height.to_string())
            .arg("-o")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                Error::Camera(format!("{} timed out after {:?}", program, self.timeout))
            })?
            .map_err(|e| Error::Camera(format!("Failed to run {}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Camera(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        let bytes = fs::read(path).await?;
        if bytes.is_empty() {
            return Err(Error::Camera(format!("{} wrote an empty frame", program)));
        }

        debug!(path = %path.display(), size = bytes.len(), "Frame captured");
        Ok(CapturedImage::from_base64(BASE64_STANDARD.encode(bytes)))
    }
}

impl CameraPort for StillCamera {
    async fn capture(&self) -> Result<CapturedImage> {
        let path = self.frame_path(Local::now());
        let result = self.capture_to(&path).await;

        if let Err(e) = fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %path.display(), error = %e, "Could not remove temporary frame");
            }
        }

        result
    }
}

/// Camera stand-in for verifying with the token only.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCamera;

impl CameraPort for DisabledCamera {
    async fn capture(&self) -> Result<CapturedImage> {
        Err(Error::Camera("camera disabled".to_string()))
    }
}
