//! Control-layer logic, deciding what to write to the backlight

pub mod brightness_controller;

pub use brightness_controller::{BacklightCommand, BrightnessController, STEP_COUNT};
