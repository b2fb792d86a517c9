use crate::external::backlight::{Backlight, BacklightError};
use std::fmt;

/// Number of steps between the minimum and the maximum brightness
pub const STEP_COUNT: u32 = 10;

/// A request to move the brightness one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BacklightCommand {
    Increase,
    Decrease,
}

impl fmt::Display for BacklightCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BacklightCommand::Increase => write!(f, "increase"),
            BacklightCommand::Decrease => write!(f, "decrease"),
        }
    }
}

/// Moves a [Backlight]'s brightness in steps of a tenth of its range.
///
/// The controller keeps no state of its own. Each step reads the device,
/// computes the clamped target and writes it back, so it's only correct while
/// nothing else writes to the device at the same time.
pub struct BrightnessController<B: Backlight> {
    device: B,
}

impl<B: Backlight> BrightnessController<B> {
    pub fn new(device: B) -> BrightnessController<B> {
        BrightnessController { device }
    }

    /// Direct access to the device, for reading its range outside of a step.
    pub fn device_mut(&mut self) -> &mut B {
        &mut self.device
    }

    /// Raises the brightness by one step. Returns the value written.
    pub fn increase(&mut self) -> Result<u32, BacklightError> {
        self.step(BacklightCommand::Increase)
    }

    /// Lowers the brightness by one step. Returns the value written.
    pub fn decrease(&mut self) -> Result<u32, BacklightError> {
        self.step(BacklightCommand::Decrease)
    }

    pub fn apply(&mut self, command: BacklightCommand) -> Result<u32, BacklightError> {
        match command {
            BacklightCommand::Increase => self.increase(),
            BacklightCommand::Decrease => self.decrease(),
        }
    }

    fn step(&mut self, direction: BacklightCommand) -> Result<u32, BacklightError> {
        let minimum = self.device.minimum();
        let maximum = self.device.maximum()?;
        let current = self.device.brightness()?;

        // Ranges narrower than STEP_COUNT give a step of 0, so the command is a no-op.
        let step_size = maximum.saturating_sub(minimum) / STEP_COUNT;
        let target = match direction {
            BacklightCommand::Increase => current.saturating_add(step_size),
            BacklightCommand::Decrease => current.saturating_sub(step_size),
        };
        let target = target.max(minimum).min(maximum);

        log::debug!(
            "{} of {}: {} -> {} (range {}..={})",
            direction,
            self.device.name(),
            current,
            target,
            minimum,
            maximum
        );
        // Written even when target == current, same as any other step.
        self.device.set_brightness(target)?;
        Ok(target)
    }
}
