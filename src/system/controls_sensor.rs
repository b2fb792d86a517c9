use super::backlight_server::BacklightPort;
use crate::{
    armaf::{ActorRequestError, Handle, HandleChild},
    config::ControlsConfig,
    control::BacklightCommand,
    external::backlight::BacklightError,
};
use anyhow::{anyhow, Result};
use std::pin::Pin;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use zbus::dbus_proxy;

/// Signals published by the control daemon when a backlight key is pressed
#[dbus_proxy(
    interface = "org.controld.Controls",
    default_service = "org.controld.Controld",
    default_path = "/org/controld/Controld"
)]
trait Controls {
    #[dbus_proxy(signal)]
    fn screen_backlight_increase(&self) -> zbus::Result<()>;

    #[dbus_proxy(signal)]
    fn screen_backlight_decrease(&self) -> zbus::Result<()>;
}

pub type CommandStream = Pin<Box<dyn Stream<Item = BacklightCommand> + Send>>;

/// Forwards control events to the backlight server.
///
/// Every command is answered before the next one is taken, so steps never
/// overlap.
pub struct ControlsSensor {
    commands: CommandStream,
    server: BacklightPort,
    // Keeps the signal subscriptions alive
    _proxy: Option<ControlsProxy<'static>>,
}

impl ControlsSensor {
    pub fn new(commands: CommandStream, server: BacklightPort) -> ControlsSensor {
        ControlsSensor {
            commands,
            server,
            _proxy: None,
        }
    }

    /// Subscribes to the control daemon's signals on `connection`.
    pub async fn connect(
        connection: &zbus::Connection,
        settings: &ControlsConfig,
        server: BacklightPort,
    ) -> Result<ControlsSensor> {
        let proxy: ControlsProxy<'static> = ControlsProxy::builder(connection)
            .destination(settings.service.clone())?
            .path(settings.path.clone())?
            .build()
            .await?;
        let increases = proxy
            .receive_screen_backlight_increase()
            .await?
            .map(|_| BacklightCommand::Increase);
        let decreases = proxy
            .receive_screen_backlight_decrease()
            .await?
            .map(|_| BacklightCommand::Decrease);
        log::info!(
            "Listening to screen backlight control events on object {} in bus name {}",
            settings.path,
            settings.service
        );
        let mut sensor = ControlsSensor::new(Box::pin(increases.merge(decreases)), server);
        sensor._proxy = Some(proxy);
        Ok(sensor)
    }

    /// Starts forwarding in a new task.
    ///
    /// The task ends when the handle is dropped or awaited, when the events
    /// run out, or with an error when a step fails in a way the daemon can't
    /// recover from.
    pub fn spawn(self) -> (Handle, JoinHandle<Result<()>>) {
        let (handle, handle_child) = Handle::new();
        let task = tokio::spawn(async move { self.run(handle_child).await });
        (handle, task)
    }

    async fn run(mut self, mut handle_child: HandleChild) -> Result<()> {
        loop {
            tokio::select! {
                _ = handle_child.should_terminate() => {
                    log::info!("Terminating ControlsSensor");
                    return Ok(());
                }
                command = self.commands.next() => match command {
                    Some(command) => self.dispatch(command).await?,
                    None => {
                        log::info!("No more control events, terminating ControlsSensor");
                        return Ok(());
                    }
                }
            }
        }
    }

    async fn dispatch(&mut self, command: BacklightCommand) -> Result<()> {
        log::debug!("Received {} command", command);
        match self.server.request(command).await {
            Ok(written) => {
                log::debug!("Brightness set to {}", written);
                Ok(())
            }
            Err(ActorRequestError::Actor(e)) if is_fatal(&e) => Err(e),
            Err(ActorRequestError::Actor(e)) => {
                log::warn!("Brightness {} aborted, nothing changed: {:#}", command, e);
                Ok(())
            }
            Err(e) => Err(anyhow!("backlight server is unreachable: {}", e)),
        }
    }
}

fn is_fatal(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<BacklightError>()
        .map_or(false, BacklightError::is_fatal)
}
