#![warn(missing_docs)]

//! A daemon adjusting the screen backlight on control events from D-Bus

mod armaf;
mod config;
mod control;
mod external;
mod logging;
mod system;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::signal::unix::{signal, SignalKind};

use armaf::spawn_server;
use config::Config;
use control::BrightnessController;
use external::{
    backlight::{
        sysfs::{self, SysfsBacklight},
        Backlight,
    },
    dbus::ConnectionFactory,
};
use system::{backlight_server::BacklightServer, controls_sensor::ControlsSensor};

/// Adjusts the screen backlight in response to control events
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// Configuration file [default: /etc/screen-backlightd.toml, if present]
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Backlight device to control, a name from /sys/class/backlight
    #[clap(short, long)]
    device: Option<String>,

    /// Print the available backlight devices and exit
    #[clap(long)]
    list_devices: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(device) = args.device {
        config.device.name = Some(device);
    }
    let _logger = logging::init(&config.log_level)?;

    if args.list_devices {
        for name in sysfs::list_devices(&config.device.sysfs_root)? {
            println!("{}", name);
        }
        return Ok(());
    }

    let result = run(&config).await;
    if let Err(e) = &result {
        log::error!("{:#}", e);
    }
    result
}

async fn run(config: &Config) -> Result<()> {
    let root = &config.device.sysfs_root;
    let device = match &config.device.name {
        Some(name) => SysfsBacklight::open(root, name)?,
        None => SysfsBacklight::discover(root)?,
    };
    log::info!(
        "Created controller for {} ({})",
        device.name(),
        device.device_path().display()
    );
    let server = spawn_server(BacklightServer::new(BrightnessController::new(device))).await?;

    let mut connections = ConnectionFactory::new();
    let connection = connections.get(config.controls.bus).await?;
    let sensor = ControlsSensor::connect(&connection, &config.controls, server.clone()).await?;
    let (sensor_handle, mut sensor_task) = sensor.spawn();

    let outcome = tokio::select! {
        received = wait_for_termination_signal() => received,
        finished = &mut sensor_task => match finished {
            Ok(result) => result,
            Err(e) => Err(e.into()),
        },
    };

    log::info!("Exiting...");
    sensor_handle.await_shutdown().await;
    log::debug!("Stopped listening to control events");
    server.await_shutdown().await;
    log::debug!("Released the backlight");
    outcome
}

async fn wait_for_termination_signal() -> Result<()> {
    let mut hangup = signal(SignalKind::hangup())?;
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    log::debug!("Installed Unix signal handlers");
    let name = tokio::select! {
        _ = hangup.recv() => "SIGHUP",
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    };
    log::info!("Received {}", name);
    Ok(())
}
