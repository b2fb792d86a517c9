//! Control of display backlights
mod error;
mod interface;
#[cfg(test)]
pub mod mock;
pub mod sysfs;

pub use error::*;
pub use interface::*;
