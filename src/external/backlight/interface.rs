use super::BacklightError;

/// A single display backlight.
///
/// Brightness values are raw device units between [Backlight::minimum] and
/// [Backlight::maximum], not percentages.
pub trait Backlight: Send + 'static {
    /// Identifier of the device, such as `intel_backlight`
    fn name(&self) -> &str;

    /// The lowest brightness, always 0.
    fn minimum(&self) -> u32 {
        0
    }

    /// The highest brightness the device accepts.
    ///
    /// Fetched from the device on the first successful call and cached for
    /// the lifetime of this object afterwards.
    fn maximum(&mut self) -> Result<u32, BacklightError>;

    /// The current brightness, fetched from the device on every call since
    /// something else may have changed it.
    fn brightness(&self) -> Result<u32, BacklightError>;

    /// Writes `value` to the device as is.
    ///
    /// Callers are expected to keep `value` between [Backlight::minimum] and
    /// [Backlight::maximum]. Nothing is clamped here, an out of range value is
    /// left for the driver to accept or refuse.
    fn set_brightness(&mut self, value: u32) -> Result<(), BacklightError>;
}
