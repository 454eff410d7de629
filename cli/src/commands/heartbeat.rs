//! Heartbeat command - one liveness report.

use anyhow::Result;
use checkpoint_core::ports::VerificationPort;
use checkpoint_core::{discover_local_ip, DeviceConfig, VerificationClient};

pub async fn run(config: &DeviceConfig, json: bool) -> Result<()> {
    let client = VerificationClient::new(config)?;
    let ip_address = discover_local_ip().await;

    let result = client.send_heartbeat(&ip_address).await;

    if json {
        let report = serde_json::json!({
            "deviceId": config.device_id,
            "ipAddress": ip_address,
            "success": result.is_ok(),
            "error": result.as_ref().err().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if result.is_ok() {
        println!("Heartbeat sent successfully ({})", ip_address);
    }

    result?;
    Ok(())
}
