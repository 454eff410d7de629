//! Verification service port (interface).

use crate::domain::{ScanEvent, VerificationResponse};
use crate::error::Result;

/// Port for the remote attendance service.
pub trait VerificationPort: Send + Sync {
    /// Report the device as online from `ip_address`.
    fn send_heartbeat(
        &self,
        ip_address: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Submit a scan for verification and return the parsed verdict.
    fn verify_entry(
        &self,
        scan: &ScanEvent,
    ) -> impl std::future::Future<Output = Result<VerificationResponse>> + Send;

    /// Address this device reports in heartbeats.
    fn local_ip(&self) -> impl std::future::Future<Output = String> + Send;
}
