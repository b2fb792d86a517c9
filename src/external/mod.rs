//! Provides abstractions over the APIs of various system components

pub mod attributes;
pub mod backlight;
pub mod dbus;
