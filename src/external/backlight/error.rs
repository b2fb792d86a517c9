use crate::external::attributes::AttributeError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a [super::Backlight].
///
/// Attribute failures are passed through unchanged, sorted by what went wrong.
#[derive(Debug, Error)]
pub enum BacklightError {
    #[error("couldn't resolve a backlight device in {}: {reason}", .class_dir.display())]
    DeviceResolution { class_dir: PathBuf, reason: String },

    #[error(transparent)]
    AttributeRead(AttributeError),

    #[error(transparent)]
    AttributeWrite(AttributeError),

    #[error(transparent)]
    ValueParse(AttributeError),
}

impl BacklightError {
    /// Whether the daemon can't sensibly go on after this error.
    ///
    /// A missing device or an attribute that isn't a number breaks the
    /// assumptions everything else relies on. I/O failures only abort the
    /// operation that hit them.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BacklightError::DeviceResolution { .. } | BacklightError::ValueParse(_)
        )
    }
}

impl From<AttributeError> for BacklightError {
    fn from(e: AttributeError) -> Self {
        match e {
            AttributeError::Read { .. } => BacklightError::AttributeRead(e),
            AttributeError::Write { .. } => BacklightError::AttributeWrite(e),
            AttributeError::Parse { .. } => BacklightError::ValueParse(e),
        }
    }
}
