//! Daemon configuration, read from a TOML file.

use anyhow::{anyhow, bail, Context, Result};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

/// Read when no configuration file is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "/etc/screen-backlightd.toml";

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SYSFS_ROOT: &str = "/sys";
const DEFAULT_CONTROLS_SERVICE: &str = "org.controld.Controld";
const DEFAULT_CONTROLS_PATH: &str = "/org/controld/Controld";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BusType {
    System,
    Session,
}

impl fmt::Display for BusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusType::System => write!(f, "system"),
            BusType::Session => write!(f, "session"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Device to control, or `None` to use the first one found
    pub name: Option<String>,
    pub sysfs_root: PathBuf,
}

/// Where the control events come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsConfig {
    pub bus: BusType,
    pub service: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: String,
    pub device: DeviceConfig,
    pub controls: ControlsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            device: DeviceConfig {
                name: None,
                sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
            },
            controls: ControlsConfig {
                bus: BusType::System,
                service: DEFAULT_CONTROLS_SERVICE.to_owned(),
                path: DEFAULT_CONTROLS_PATH.to_owned(),
            },
        }
    }
}

impl Config {
    /// Loads the configuration from `path`.
    ///
    /// Without a path, [DEFAULT_CONFIG_PATH] is used if it exists and the
    /// defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let path = match path {
            Some(p) => p,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if !default_path.exists() {
                    return Ok(Config::default());
                }
                default_path
            }
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("couldn't read configuration {}", path.display()))?;
        Config::parse(&text).with_context(|| format!("invalid configuration {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Config> {
        let value: toml::Value = text.parse()?;
        let mut config = Config::default();

        if let Some(level) = get_str(&value, "log_level")? {
            config.log_level = level.to_owned();
        }

        if let Some(device) = get_table(&value, "device")? {
            config.device.name = get_str(device, "device.name")?.map(str::to_owned);
            if let Some(root) = get_str(device, "device.sysfs_root")? {
                config.device.sysfs_root = PathBuf::from(root);
            }
        }

        if let Some(controls) = get_table(&value, "controls")? {
            if let Some(bus) = get_str(controls, "controls.bus")? {
                config.controls.bus = match bus {
                    "system" => BusType::System,
                    "session" => BusType::Session,
                    other => bail!(
                        "controls.bus should be \"system\" or \"session\", not {:?}",
                        other
                    ),
                };
            }
            if let Some(service) = get_str(controls, "controls.service")? {
                config.controls.service = service.to_owned();
            }
            if let Some(path) = get_str(controls, "controls.path")? {
                config.controls.path = path.to_owned();
            }
        }
        Ok(config)
    }
}

/// Last component of a dotted key, the part looked up in its own table
fn leaf(key: &str) -> &str {
    key.rsplit('.').next().unwrap_or(key)
}

fn get_str<'a>(table: &'a toml::Value, key: &str) -> Result<Option<&'a str>> {
    match table.get(leaf(key)) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| anyhow!("{} should be a string", key)),
    }
}

fn get_table<'a>(table: &'a toml::Value, key: &str) -> Result<Option<&'a toml::Value>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) if value.is_table() => Ok(Some(value)),
        Some(_) => Err(anyhow!("{} should be a table", key)),
    }
}
