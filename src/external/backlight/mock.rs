use std::{
    io,
    num::ParseIntError,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use super::{Backlight, BacklightError};
use crate::external::attributes::AttributeError;

/// How a failing [MockBacklight] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Every operation fails as if the device disappeared
    Io,
    /// Reads return content which isn't a number
    Garbage,
}

#[derive(Debug, Default)]
struct MockState {
    brightness: u32,
    maximum: u32,
    failure: Option<MockFailure>,
    maximum_reads: usize,
    brightness_reads: usize,
    writes: Vec<u32>,
}

/// A [Backlight] kept in memory, usable when testing code built on the trait.
///
/// Clones share the device state and counters, but each clone caches the
/// maximum on its own like a separately resolved device would.
#[derive(Debug, Clone)]
pub struct MockBacklight {
    state: Arc<Mutex<MockState>>,
    cached_maximum: Option<u32>,
}

impl MockBacklight {
    pub fn new(brightness: u32, maximum: u32) -> MockBacklight {
        MockBacklight {
            state: Arc::new(Mutex::new(MockState {
                brightness,
                maximum,
                ..Default::default()
            })),
            cached_maximum: None,
        }
    }

    /// Make operations fail in the given way, or stop failing with `None`
    pub fn set_failure_mode(&self, failure: Option<MockFailure>) {
        self.state.lock().unwrap().failure = failure;
    }

    /// Change the brightness behind the back of whoever holds the device
    pub fn set_external_brightness(&self, brightness: u32) {
        self.state.lock().unwrap().brightness = brightness;
    }

    pub fn current(&self) -> u32 {
        self.state.lock().unwrap().brightness
    }

    pub fn maximum_reads(&self) -> usize {
        self.state.lock().unwrap().maximum_reads
    }

    pub fn brightness_reads(&self) -> usize {
        self.state.lock().unwrap().brightness_reads
    }

    /// Every value passed to a successful set_brightness, in order
    pub fn writes(&self) -> Vec<u32> {
        self.state.lock().unwrap().writes.clone()
    }

    fn read(state: &MockState, attribute: &str, value: u32) -> Result<u32, BacklightError> {
        let path = PathBuf::from("/mock").join(attribute);
        match state.failure {
            None => Ok(value),
            Some(MockFailure::Io) => Err(AttributeError::Read {
                path,
                source: io::Error::new(io::ErrorKind::NotFound, "mock device is gone"),
            }
            .into()),
            Some(MockFailure::Garbage) => Err(AttributeError::Parse {
                path,
                content: "abc".to_owned(),
                source: garbage_error().into(),
            }
            .into()),
        }
    }
}

fn garbage_error() -> ParseIntError {
    "abc".parse::<u32>().unwrap_err()
}

impl Backlight for MockBacklight {
    fn name(&self) -> &str {
        "mock_backlight"
    }

    fn maximum(&mut self) -> Result<u32, BacklightError> {
        if let Some(maximum) = self.cached_maximum {
            return Ok(maximum);
        }
        let maximum = {
            let mut state = self.state.lock().unwrap();
            state.maximum_reads += 1;
            Self::read(&state, "max_brightness", state.maximum)?
        };
        self.cached_maximum = Some(maximum);
        Ok(maximum)
    }

    fn brightness(&self) -> Result<u32, BacklightError> {
        let mut state = self.state.lock().unwrap();
        state.brightness_reads += 1;
        Self::read(&state, "brightness", state.brightness)
    }

    fn set_brightness(&mut self, value: u32) -> Result<(), BacklightError> {
        let mut state = self.state.lock().unwrap();
        if state.failure == Some(MockFailure::Io) {
            return Err(AttributeError::Write {
                path: PathBuf::from("/mock/brightness"),
                value,
                source: io::Error::new(io::ErrorKind::NotFound, "mock device is gone"),
            }
            .into());
        }
        state.brightness = value;
        state.writes.push(value);
        Ok(())
    }
}
