//! HTTP client for the attendance service.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use tokio::net::UdpSocket;
use tracing::debug;

use crate::config::DeviceConfig;
use crate::domain::{ScanEvent, VerificationResponse};
use crate::error::{Error, Result};
use crate::ports::VerificationPort;

pub const HEARTBEAT_ENDPOINT: &str = "heartbeat.php";
pub const VERIFY_ENDPOINT: &str = "verify-entry.php";

/// Header carrying the device key on every request.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Reported when the local address cannot be determined.
pub const UNKNOWN_IP: &str = "unknown";

#[derive(Debug, Serialize)]
struct HeartbeatRequest<'a> {
    status: &'a str,
    ip_address: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    student_id: &'a str,
    face_image: Option<&'a str>,
}

/// Client for `heartbeat.php` and `verify-entry.php`.
#[derive(Debug, Clone)]
pub struct VerificationClient {
    client: reqwest::Client,
    base_url: String,
    heartbeat_timeout: Duration,
    verify_timeout: Duration,
}

impl VerificationClient {
    /// Build a client that sends the configured API key with every request.
    pub fn new(config: &DeviceConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| Error::Config("apiKey is not a valid header value".to_string()))?;
        headers.insert(API_KEY_HEADER, key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim().trim_end_matches('/').to_string(),
            heartbeat_timeout: config.heartbeat_timeout(),
            verify_timeout: config.verify_timeout(),
        })
    }

    /// Full URL of an endpoint file.
    pub fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

impl VerificationPort for VerificationClient {
    async fn send_heartbeat(&self, ip_address: &str) -> Result<()> {
        let url = self.endpoint(HEARTBEAT_ENDPOINT);
        let body = HeartbeatRequest {
            status: "online",
            ip_address,
        };

        debug!(%url, ip_address, "Sending heartbeat");
        let response = self
            .client
            .post(&url)
            .timeout(self.heartbeat_timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                endpoint: HEARTBEAT_ENDPOINT.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn verify_entry(&self, scan: &ScanEvent) -> Result<VerificationResponse> {
        let url = self.endpoint(VERIFY_ENDPOINT);
        let body = VerifyRequest {
            student_id: scan.token_id.as_str(),
            face_image: scan.face_image.as_ref().map(|image| image.as_base64()),
        };

        debug!(
            %url,
            token = %scan.token_id,
            image_bytes = scan.face_image.as_ref().map_or(0, |image| image.len()),
            "Sending verification request"
        );
        let response = self
            .client
            .post(&url)
            .timeout(self.verify_timeout)
            .json(&body)
            .send()
            .await?;

        // Denials come back with a JSON body too, so the status is informational.
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(status = status.as_u16(), size = bytes.len(), "Verification response received");

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn local_ip(&self) -> String {
        discover_local_ip().await
    }
}

/// Address of the interface that routes to the internet.
///
/// Connecting a UDP socket only selects a route; no packet is sent.
pub async fn discover_local_ip() -> String {
    let probe = async {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect("8.8.8.8:80").await?;
        socket.local_addr()
    };

    match probe.await {
        Ok(addr) if !addr.ip().is_unspecified() => addr.ip().to_string(),
        Ok(_) => UNKNOWN_IP.to_string(),
        Err(e) => {
            debug!(error = %e, "Local IP discovery failed");
            UNKNOWN_IP.to_string()
        }
    }
}
