//! Tracing subscriber setup.

use std::env;

use tracing_subscriber::EnvFilter;

/// Selects the log output format; `json` switches to one JSON object per line.
const LOG_FORMAT_VAR: &str = "HARVEST_LOG_FORMAT";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Read the format from `HARVEST_LOG_FORMAT`. Anything but `json` is text.
    pub fn from_env() -> Self {
        Self::parse(env::var(LOG_FORMAT_VAR).ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Install the global subscriber.
///
/// The filter comes from `RUST_LOG` and defaults to `info`. Logs go to
/// stderr so command output on stdout stays clean.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
