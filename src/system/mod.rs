//! Actors bound to the world outside the daemon

pub mod backlight_server;
pub mod controls_sensor;
