//! Diagnostic logging for the `hcsolver` binary.
//!
//! Everything goes to `stderr`; `stdout` carries only the rendered partition.
//! Two environment variables drive the subscriber:
//!
//! - `HCSOLVER_LOG_FORMAT` selects `human` (default) or `json` lines.
//! - `RUST_LOG` holds `EnvFilter` directives and defaults to `info`.
//!
//! Records emitted through the `log` facade are forwarded into `tracing`.

use std::{env, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, filter::ParseError, fmt::format::FmtSpan, layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Variable naming the output format.
pub const FORMAT_VAR: &str = "HCSOLVER_LOG_FORMAT";
/// Variable holding filter directives.
pub const FILTER_VAR: &str = EnvFilter::DEFAULT_ENV;

const FALLBACK_DIRECTIVES: &str = "info";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Shape of each emitted line.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Plain text for terminals.
    #[default]
    Human,
    /// Newline-delimited JSON including the span stack.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalised = raw.trim();
        if normalised.is_empty() || normalised.eq_ignore_ascii_case("human") {
            Ok(Self::Human)
        } else if normalised.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(LoggingError::UnknownFormat {
                value: normalised.to_owned(),
            })
        }
    }
}

/// Failures while configuring diagnostics.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A logging variable was set to bytes that are not UTF-8.
    #[error("`{var}` is not valid UTF-8")]
    NotUnicode {
        /// Variable name.
        var: &'static str,
        /// Error from `std::env`.
        #[source]
        source: env::VarError,
    },
    /// `HCSOLVER_LOG_FORMAT` named something other than `human` or `json`.
    #[error("`{value}` is not a log format; use `human` or `json`")]
    UnknownFormat {
        /// Trimmed value that was rejected.
        value: String,
    },
    /// `RUST_LOG` could not be parsed as filter directives.
    #[error("invalid log filter `{directives}`: {source}")]
    InvalidFilter {
        /// Directives as supplied.
        directives: String,
        /// Parser error.
        #[source]
        source: ParseError,
    },
    /// Some other subscriber already owns the global default.
    #[error("a global tracing subscriber is already installed: {source}")]
    AlreadyInstalled {
        /// Error from `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Resolved logging configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogSettings {
    /// Line format.
    pub format: LogFormat,
    /// `EnvFilter` directives.
    pub directives: String,
}

impl LogSettings {
    /// Builds settings from raw variable values; `None` means unset.
    ///
    /// # Errors
    /// Returns [`LoggingError::UnknownFormat`] for an unrecognised format.
    pub fn from_values(format: Option<&str>, directives: Option<&str>) -> Result<Self, LoggingError> {
        let format = format.map_or(Ok(LogFormat::default()), str::parse)?;
        let directives = directives
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(FALLBACK_DIRECTIVES)
            .to_owned();
        Ok(Self { format, directives })
    }

    /// Reads [`FORMAT_VAR`] and [`FILTER_VAR`] from the process environment.
    ///
    /// # Errors
    /// Returns [`LoggingError`] when either variable is not UTF-8 or the
    /// format is unrecognised.
    pub fn from_env() -> Result<Self, LoggingError> {
        let format = read_var(FORMAT_VAR)?;
        let directives = read_var(FILTER_VAR)?;
        Self::from_values(format.as_deref(), directives.as_deref())
    }

    /// Parses the directives into a filter.
    ///
    /// # Errors
    /// Returns [`LoggingError::InvalidFilter`] when the directives are malformed.
    pub fn filter(&self) -> Result<EnvFilter, LoggingError> {
        EnvFilter::try_new(&self.directives).map_err(|source| LoggingError::InvalidFilter {
            directives: self.directives.clone(),
            source,
        })
    }
}

fn read_var(var: &'static str) -> Result<Option<String>, LoggingError> {
    match env::var(var) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(source) => Err(LoggingError::NotUnicode { var, source }),
    }
}

/// Installs the process-wide subscriber described by the environment.
///
/// Later calls return immediately. When another subscriber already owns the
/// global slot the existing one is kept and the call still succeeds.
///
/// # Errors
/// Returns [`LoggingError`] when the environment holds an unusable setting.
pub fn init_logging() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }
    let settings = LogSettings::from_env()?;
    match install(&settings) {
        Ok(()) | Err(LoggingError::AlreadyInstalled { .. }) => {
            let _ = INSTALLED.set(());
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn install(settings: &LogSettings) -> Result<(), LoggingError> {
    let filter = settings.filter()?;
    let base = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);
    let output = match settings.format {
        LogFormat::Human => base.with_target(false).boxed(),
        LogFormat::Json => base
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // The `log` bridge may already be claimed by an embedding process.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
        .map_err(|source| LoggingError::AlreadyInstalled { source })
}
