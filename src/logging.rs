use anyhow::Result;
use flexi_logger::{Logger, LoggerHandle};

/// Starts logging to stderr.
///
/// `RUST_LOG` takes precedence over `level`. Panics are routed to the log too.
/// The returned handle has to be kept alive for as long as the process logs.
pub fn init(level: &str) -> Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str(level)?
        .log_to_stderr()
        .format(flexi_logger::detailed_format)
        .start()?;
    log_panics::init();
    Ok(handle)
}
