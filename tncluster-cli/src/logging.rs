//! Diagnostics for the `tncluster` binary.
//!
//! Trees and cluster tables own stdout, so every diagnostic goes to stderr.
//! How much is shown follows the command line: a quiet run reports only
//! warnings and the final error, while `--verbose` also shows the `info`
//! summaries of the chosen inputs and threshold. `RUST_LOG` overrides either
//! default, and `TNCLUSTER_LOG_FORMAT=json` switches to one JSON object per
//! line for machine consumers.

use std::env::{self, VarError};

use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Layer, filter::ParseError as FilterParseError, layer::SubscriberExt,
    util::SubscriberInitExt,
};

const FORMAT_ENV: &str = "TNCLUSTER_LOG_FORMAT";
const FILTER_ENV: &str = "RUST_LOG";

/// Filter applied to quiet runs when `RUST_LOG` is unset.
pub const QUIET_DIRECTIVE: &str = "warn";
/// Filter applied to `--verbose` runs when `RUST_LOG` is unset.
pub const VERBOSE_DIRECTIVE: &str = "info";

/// Errors raised while configuring diagnostics.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// An environment variable held bytes that are not UTF-8.
    #[error("`{name}` is not valid UTF-8")]
    NotUnicode {
        /// Name of the offending variable.
        name: &'static str,
    },
    /// `TNCLUSTER_LOG_FORMAT` named an unknown format.
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat {
        /// The value as supplied.
        provided: String,
    },
    /// `RUST_LOG` could not be parsed as a filter.
    #[error("invalid `RUST_LOG` directive `{directive}`: {source}")]
    InvalidFilter {
        /// The directive as supplied.
        directive: String,
        /// Parser failure from `tracing-subscriber`.
        #[source]
        source: FilterParseError,
    },
}

/// Rendering used for diagnostics on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact human-readable lines.
    #[default]
    Human,
    /// One JSON object per event, including the enclosing spans.
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Result<Self, LoggingError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

/// Resolved diagnostics configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    format: LogFormat,
    directive: String,
}

impl LogSettings {
    /// Reads `TNCLUSTER_LOG_FORMAT` and `RUST_LOG` for a run with the given
    /// verbosity.
    ///
    /// # Errors
    /// Returns [`LoggingError`] when either variable is malformed.
    pub fn from_env(verbose: bool) -> Result<Self, LoggingError> {
        Self::resolve(env::var(FORMAT_ENV), env::var(FILTER_ENV), verbose)
    }

    fn resolve(
        format: Result<String, VarError>,
        filter: Result<String, VarError>,
        verbose: bool,
    ) -> Result<Self, LoggingError> {
        let format = match present(format, FORMAT_ENV)? {
            Some(raw) => LogFormat::parse(&raw)?,
            None => LogFormat::default(),
        };
        let directive = present(filter, FILTER_ENV)?
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or_else(|| default_directive(verbose).to_owned());
        Ok(Self { format, directive })
    }

    /// Returns the selected output format.
    #[must_use]
    pub const fn format(&self) -> LogFormat {
        self.format
    }

    /// Returns the filter directive that will be installed.
    #[must_use]
    pub fn directive(&self) -> &str {
        &self.directive
    }

    fn filter(&self) -> Result<EnvFilter, LoggingError> {
        EnvFilter::try_new(&self.directive).map_err(|source| LoggingError::InvalidFilter {
            directive: self.directive.clone(),
            source,
        })
    }
}

/// Returns the filter used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_DIRECTIVE
    } else {
        QUIET_DIRECTIVE
    }
}

fn present(value: Result<String, VarError>, name: &'static str) -> Result<Option<String>, LoggingError> {
    match value {
        Ok(raw) => Ok(Some(raw)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(LoggingError::NotUnicode { name }),
    }
}

/// Installs the stderr subscriber described by `settings`.
///
/// Returns `Ok(false)` without changing anything when a global subscriber is
/// already installed, as happens when the library is embedded in another
/// program.
///
/// # Errors
/// Returns [`LoggingError::InvalidFilter`] when the filter directive does not
/// parse.
pub fn init_logging(settings: &LogSettings) -> Result<bool, LoggingError> {
    let filter = settings.filter()?;
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let layer = match settings.format() {
        LogFormat::Human => layer.compact().with_target(false).boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };
    Ok(tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok())
}
