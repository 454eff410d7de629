//! Config command - show or initialise the device configuration.

use anyhow::{bail, Result};
use checkpoint_core::{ConfigStore, DeviceConfig};

pub async fn show(store: &ConfigStore, init: bool, json: bool) -> Result<()> {
    if init {
        if store.path().exists() {
            bail!("{} already exists", store.path().display());
        }
        store.save(&DeviceConfig::default()).await?;
        println!("Wrote default configuration to {}", store.path().display());
        return Ok(());
    }

    let config = store.load().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let source = if store.path().exists() {
        store.path().display().to_string()
    } else {
        "built-in defaults".to_string()
    };

    println!("Configuration ({})", source);
    println!("{}", "-".repeat(50));
    println!("{:<22} {}", "Device ID", config.device_id);
    println!("{:<22} {}", "API URL", config.api_base_url);
    println!("{:<22} {}", "API key", mask(&config.api_key));
    println!(
        "{:<22} buzzer {}, green {}, red {}",
        "GPIO pins", config.pins.buzzer, config.pins.green_led, config.pins.red_led
    );
    println!("{:<22} {}", "GPIO root", config.gpio_root.display());
    println!(
        "{:<22} {} {}x{}",
        "Camera", config.camera.command, config.camera.width, config.camera.height
    );
    println!(
        "{:<22} {}",
        "Token reader",
        config
            .reader_device
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdin".to_string())
    );
    println!("{:<22} {}s", "Heartbeat interval", config.heartbeat_interval_secs);
    println!(
        "{:<22} heartbeat {}s, verify {}s",
        "Timeouts", config.heartbeat_timeout_secs, config.verify_timeout_secs
    );

    Ok(())
}

fn mask(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}****", visible)
}
