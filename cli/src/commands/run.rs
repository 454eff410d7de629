//! Run command - the scan loop.

use std::future::Future;

use anyhow::Result;
use checkpoint_core::ports::{ActuatorPort, TokenReaderPort};
use checkpoint_core::{
    CheckpointService, ConsoleDisplay, DeviceConfig, GpioActuator, LineTokenReader,
    LoggingActuator, StillCamera, VerificationClient,
};
use tracing::info;
#[cfg(not(unix))]
use tracing::warn;

pub async fn run(config: DeviceConfig, no_gpio: bool) -> Result<()> {
    println!("IoT Device {} starting...", config.device_id);
    println!("API URL: {}", config.api_base_url);

    // Handlers go in before any GPIO line is claimed, so every signal after
    // this point ends in a clean release.
    let shutdown = shutdown_signal()?;
    let verifier = VerificationClient::new(&config)?;

    match &config.reader_device {
        Some(device) => {
            let reader = LineTokenReader::open(device).await?;
            info!(device = %device.display(), "Token reader opened");
            with_actuator(reader, verifier, &config, no_gpio, shutdown).await
        }
        None => {
            info!("Reading tokens from stdin");
            with_actuator(LineTokenReader::stdin(), verifier, &config, no_gpio, shutdown).await
        }
    }
}

async fn with_actuator<R: TokenReaderPort>(
    reader: R,
    verifier: VerificationClient,
    config: &DeviceConfig,
    no_gpio: bool,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    if no_gpio {
        serve(reader, LoggingActuator::new(), verifier, config, shutdown).await
    } else {
        let gpio = GpioActuator::acquire(config.gpio_root.clone(), config.pins).await?;
        serve(reader, gpio, verifier, config, shutdown).await
    }
}

/// Drive the loop until interrupted. The service owns the hardware handles,
/// which are released when it goes out of scope.
async fn serve<R: TokenReaderPort, A: ActuatorPort>(
    reader: R,
    actuator: A,
    verifier: VerificationClient,
    config: &DeviceConfig,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let mut service = CheckpointService::new(
        reader,
        StillCamera::new(config.camera.clone()),
        actuator,
        verifier,
        ConsoleDisplay::new(),
        config.heartbeat_interval(),
    );

    service.run(shutdown).await;
    println!("\nShutting down...");
    Ok(())
}

/// Install Ctrl-C and SIGTERM handlers now. The returned future resolves on
/// the first of either, including one that arrived before it was polled.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => {}
            _ = terminate.recv() => {}
        }
        info!("Shutdown signal received");
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    })
}
