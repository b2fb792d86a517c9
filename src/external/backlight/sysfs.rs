use super::{Backlight, BacklightError};
use crate::external::attributes;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// The kernel device class backlights are registered under
pub const BACKLIGHT_CLASS: &str = "backlight";

const BRIGHTNESS: &str = "brightness";
const MAX_BRIGHTNESS: &str = "max_brightness";

/// A [Backlight] driven through the kernel's `/sys/class/backlight` device
/// class.
///
/// The device is resolved once, when the object is created. All reads and
/// writes go straight to its sysfs attributes, so the process needs write
/// access to `brightness` (usually root or a udev rule).
#[derive(Debug)]
pub struct SysfsBacklight {
    name: String,
    device_path: PathBuf,
    maximum: Option<u32>,
}

impl SysfsBacklight {
    /// Resolves the device called `name` in the backlight class under
    /// `sysfs_root` (normally `/sys`).
    pub fn open(sysfs_root: &Path, name: &str) -> Result<SysfsBacklight, BacklightError> {
        let class_dir = class_dir(sysfs_root);
        let resolution_error = |reason: String| BacklightError::DeviceResolution {
            class_dir: class_dir.clone(),
            reason,
        };
        if name.is_empty() || name == "." || name == ".." || name.contains('/') {
            return Err(resolution_error(format!(
                "{:?} is not a device name",
                name
            )));
        }
        // Class entries are symlinks into /sys/devices, follow them once so
        // the device stays the same even if the class entry is replaced.
        let device_path = match fs::canonicalize(class_dir.join(name)) {
            Ok(path) if path.is_dir() => path,
            _ => return Err(resolution_error(format!("no device named {:?}", name))),
        };
        log::debug!("Resolved backlight {} to {}", name, device_path.display());
        Ok(SysfsBacklight {
            name: name.to_owned(),
            device_path,
            maximum: None,
        })
    }

    /// Resolves the first device in the backlight class, by name order.
    pub fn discover(sysfs_root: &Path) -> Result<SysfsBacklight, BacklightError> {
        let devices = list_devices(sysfs_root)?;
        match devices.first() {
            Some(name) => {
                log::info!(
                    "Discovered {} backlight device(s), using {}",
                    devices.len(),
                    name
                );
                SysfsBacklight::open(sysfs_root, name)
            }
            None => Err(BacklightError::DeviceResolution {
                class_dir: class_dir(sysfs_root),
                reason: "the class has no devices".to_owned(),
            }),
        }
    }

    /// Directory of the resolved device
    pub fn device_path(&self) -> &Path {
        &self.device_path
    }
}

impl Backlight for SysfsBacklight {
    fn name(&self) -> &str {
        &self.name
    }

    fn maximum(&mut self) -> Result<u32, BacklightError> {
        if let Some(maximum) = self.maximum {
            return Ok(maximum);
        }
        let maximum = attributes::read_uint(&self.device_path, MAX_BRIGHTNESS)?;
        self.maximum = Some(maximum);
        Ok(maximum)
    }

    fn brightness(&self) -> Result<u32, BacklightError> {
        Ok(attributes::read_uint(&self.device_path, BRIGHTNESS)?)
    }

    fn set_brightness(&mut self, value: u32) -> Result<(), BacklightError> {
        Ok(attributes::write_uint(&self.device_path, BRIGHTNESS, value)?)
    }
}

impl Drop for SysfsBacklight {
    fn drop(&mut self) {
        log::debug!("Releasing backlight device {}", self.name);
    }
}

/// Names of all devices in the backlight class under `sysfs_root`, sorted.
pub fn list_devices(sysfs_root: &Path) -> Result<Vec<String>, BacklightError> {
    let class_dir = class_dir(sysfs_root);
    let entries = match fs::read_dir(&class_dir) {
        Ok(entries) => entries,
        Err(e) => {
            return Err(BacklightError::DeviceResolution {
                class_dir,
                reason: format!("couldn't list the class: {}", e),
            })
        }
    };
    let mut names = vec![];
    for entry in entries.flatten() {
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => log::debug!("Skipping backlight device {:?}", name),
        }
    }
    names.sort();
    Ok(names)
}

fn class_dir(sysfs_root: &Path) -> PathBuf {
    sysfs_root.join("class").join(BACKLIGHT_CLASS)
}
