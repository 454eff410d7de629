//! Verify command - submit one token by hand.

use anyhow::Result;
use checkpoint_core::ports::{CameraPort, VerificationPort};
use checkpoint_core::{
    CheckpointService, ConsoleDisplay, DeviceConfig, DisabledCamera, LineTokenReader,
    LoggingActuator, ScanEvent, StillCamera, TokenId, VerificationClient,
};

pub async fn run(config: &DeviceConfig, token: &str, no_photo: bool, json: bool) -> Result<()> {
    let token = TokenId::parse(token)?;
    let client = VerificationClient::new(config)?;

    if no_photo {
        submit(token, DisabledCamera, client, config, json).await
    } else {
        let camera = StillCamera::new(config.camera.clone());
        submit(token, camera, client, config, json).await
    }
}

async fn submit<C: CameraPort>(
    token: TokenId,
    camera: C,
    client: VerificationClient,
    config: &DeviceConfig,
    json: bool,
) -> Result<()> {
    if json {
        // Raw service reply; capture failures degrade to a token-only request.
        let scan = ScanEvent::new(token, camera.capture().await.ok());
        let response = client.verify_entry(&scan).await?;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    // Same sequence as a real scan, with signals logged instead of driven.
    let service = CheckpointService::new(
        LineTokenReader::new(tokio::io::empty()),
        camera,
        LoggingActuator::new(),
        client,
        ConsoleDisplay::new(),
        config.heartbeat_interval(),
    );
    service.process_token(token).await;
    Ok(())
}
