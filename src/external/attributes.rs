//! Numeric sysfs attributes.
//!
//! Every attribute the backlight class exposes holds a single decimal integer
//! followed by a newline. Each call here performs exactly one blocking read or
//! write, nothing is cached or retried.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    num::ParseIntError,
    path::{Path, PathBuf},
    str::{self, Utf8Error},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttributeError {
    #[error("couldn't read attribute {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("couldn't write {value} to attribute {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        value: u32,
        #[source]
        source: io::Error,
    },

    #[error("attribute {} holds {content:?}, not an unsigned integer: {source}", .path.display())]
    Parse {
        path: PathBuf,
        content: String,
        #[source]
        source: ValueError,
    },
}

/// Why an attribute's content isn't an unsigned integer.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("content isn't valid UTF-8")]
    Encoding(#[from] Utf8Error),
    #[error(transparent)]
    Number(#[from] ParseIntError),
}

/// Parses the content of a numeric attribute.
///
/// Surrounding whitespace is ignored. Empty, non-numeric and out of range
/// contents are errors, never a default value.
pub fn parse_uint(content: &str) -> Result<u32, ParseIntError> {
    content.trim().parse()
}

/// Reads `attribute` of the device at `device` as an unsigned integer.
pub fn read_uint(device: &Path, attribute: &str) -> Result<u32, AttributeError> {
    let path = device.join(attribute);
    let bytes = match fs::read(&path) {
        Ok(b) => b,
        Err(source) => return Err(AttributeError::Read { path, source }),
    };
    let parsed = str::from_utf8(&bytes)
        .map_err(ValueError::from)
        .and_then(|content| parse_uint(content).map_err(ValueError::from));
    parsed.map_err(|source| AttributeError::Parse {
        path,
        content: String::from_utf8_lossy(&bytes).into_owned(),
        source,
    })
}

/// Writes `value` in decimal to `attribute` of the device at `device`.
///
/// The attribute has to exist already, sysfs doesn't allow creating new ones.
/// Whatever it held before is replaced entirely.
pub fn write_uint(device: &Path, attribute: &str, value: u32) -> Result<(), AttributeError> {
    let path = device.join(attribute);
    let result = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(&path)
        .and_then(|mut f| f.write_all(value.to_string().as_bytes()));
    result.map_err(|source| AttributeError::Write {
        path,
        value,
        source,
    })
}
