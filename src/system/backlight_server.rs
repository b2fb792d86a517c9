use crate::{
    armaf::{ActorPort, Server},
    control::{BacklightCommand, BrightnessController},
    external::backlight::Backlight,
};
use anyhow::Result;
use async_trait::async_trait;

/// Port of a running [BacklightServer]. Answers with the brightness written.
pub type BacklightPort = ActorPort<BacklightCommand, u32, anyhow::Error>;

/// Owns the [BrightnessController] and applies commands to it one at a time,
/// which makes it the only writer of the backlight.
pub struct BacklightServer<B: Backlight> {
    controller: BrightnessController<B>,
}

impl<B: Backlight> BacklightServer<B> {
    pub fn new(controller: BrightnessController<B>) -> BacklightServer<B> {
        BacklightServer { controller }
    }
}

#[async_trait]
impl<B: Backlight> Server<BacklightCommand, u32> for BacklightServer<B> {
    fn get_name(&self) -> String {
        "BacklightServer".to_owned()
    }

    async fn initialize(&mut self) -> Result<()> {
        let device = self.controller.device_mut();
        let minimum = device.minimum();
        let maximum = device.maximum()?;
        let current = device.brightness()?;
        log::info!(
            "Controlling backlight {} (range {}..={}, currently {})",
            device.name(),
            minimum,
            maximum,
            current
        );
        Ok(())
    }

    async fn handle_message(&mut self, command: BacklightCommand) -> Result<u32> {
        Ok(self.controller.apply(command)?)
    }
}
