//! # Logger
//!
//! Process-wide `tracing` setup for the storefront binaries. Console output goes to stderr
//! so that command output on stdout stays machine readable. A rolling log file, written by a
//! non-blocking worker, can be added on top.
//!
//! * [`LoggerBuilder::filter`] takes `EnvFilter` directives (`"storefront_catalog=debug"`);
//!   without one, `RUST_LOG` is honoured.
//! * [`Logger::from_settings`] builds the subscriber from the `[logging]` settings section.
//!
//! ## Example
//!
//! ```rust
//! # use storefront_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("storefront")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use storefront_domain::settings::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const RETAINED_FILES: usize = 10;
const LOG_EXTENSION: &str = "log";

type Filtered = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync>;

#[derive(Debug)]
struct Options {
    console: bool,
    level: LevelFilter,
    filter: Option<String>,
}

/// Rolling log file destination.
#[derive(Debug)]
pub struct FileSink {
    directory: PathBuf,
    rotation: Rotation,
    retain: usize,
    json: bool,
}

#[derive(Debug)]
pub struct Unnamed;
#[derive(Debug)]
pub struct Named(String);
#[derive(Debug)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile(FileSink);

mod private {
    pub trait Sealed {}
}
impl private::Sealed for NoFile {}
impl private::Sealed for WithFile {}

/// Whether a builder has a file destination.
pub trait FileState: private::Sealed {
    fn into_sink(self) -> Option<FileSink>;
}

impl FileState for NoFile {
    fn into_sink(self) -> Option<FileSink> {
        None
    }
}

impl FileState for WithFile {
    fn into_sink(self) -> Option<FileSink> {
        Some(self.0)
    }
}

/// Configures the global tracing subscriber. A name is required first; file options only
/// exist after [`LoggerBuilder::log_to`].
#[derive(Debug)]
pub struct LoggerBuilder<N = Unnamed, F = NoFile> {
    options: Options,
    name: N,
    file: F,
}

impl<F: FileState> LoggerBuilder<Unnamed, F> {
    /// Name of the process; also the prefix of the log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named, F> {
        LoggerBuilder { options: self.options, name: Named(name.into()), file: self.file }
    }
}

impl<F: FileState> LoggerBuilder<Named, F> {
    /// Level used where no filter directive applies.
    #[must_use = "a builder does nothing until `init` is called"]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.options.level = level;
        self
    }

    /// `EnvFilter` directives, e.g. `storefront_shipping=debug`. Replaces `RUST_LOG`.
    #[must_use = "a builder does nothing until `init` is called"]
    pub fn filter(mut self, directives: impl Into<String>) -> Self {
        self.options.filter = Some(directives.into());
        self
    }

    #[must_use = "a builder does nothing until `init` is called"]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.options.console = enabled;
        self
    }

    /// Adds daily rolling files under `directory`.
    pub fn log_to(self, directory: impl Into<PathBuf>) -> LoggerBuilder<Named, WithFile> {
        let sink =
            FileSink { directory: directory.into(), rotation: Rotation::DAILY, retain: RETAINED_FILES, json: false };
        LoggerBuilder { options: self.options, name: self.name, file: WithFile(sink) }
    }

    /// Installs the global subscriber.
    ///
    /// The returned [`Logger`] owns the file worker; buffered lines are flushed when it drops.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for a blank name, zero retained files, bad
    ///   filter directives or when neither console nor file output is enabled.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] when the log directory is unusable.
    /// * [`LoggerError::Subscriber`] when a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Named(name) = self.name;
        let sink = self.file.into_sink();
        self.options.validate(&name, sink.as_ref())?;
        let filter = self.options.env_filter()?;

        let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
        if self.options.console {
            layers.push(console_layer());
        }
        let guard = match sink {
            Some(sink) => {
                let (file_layer, guard) = file_layer(&name, sink)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;
        Ok(Logger { guard })
    }
}

impl LoggerBuilder<Named, WithFile> {
    #[must_use = "a builder does nothing until `init` is called"]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.file.0.rotation = rotation;
        self
    }

    /// Number of rotated files kept on disk.
    #[must_use = "a builder does nothing until `init` is called"]
    pub const fn retain(mut self, files: usize) -> Self {
        self.file.0.retain = files;
        self
    }

    /// Writes the file as JSON lines.
    #[must_use = "a builder does nothing until `init` is called"]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.file.0.json = enabled;
        self
    }
}

/// Installed logging. Keep it alive until shutdown.
#[must_use = "dropping the logger stops the log file worker"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder {
            options: Options { console: true, level: LevelFilter::INFO, filter: None },
            name: Unnamed,
            file: NoFile,
        }
    }

    /// Installs logging described by a `[logging]` settings section.
    ///
    /// ```toml
    /// [logging]
    /// level = "debug"
    /// console = true
    /// directory = "logs"
    /// json = false
    /// filter = "storefront_catalog=trace"
    /// ```
    ///
    /// # Errors
    /// As [`LoggerBuilder::init`]; an unknown `level` is an
    /// [`LoggerError::InvalidConfiguration`].
    pub fn from_settings(name: impl Into<String>, settings: &LoggingSettings) -> Result<Self, LoggerError> {
        let level: LevelFilter = settings.level.trim().parse().map_err(|_| LoggerError::InvalidConfiguration {
            message: format!("Unknown log level '{}'", settings.level).into(),
            context: None,
        })?;

        let mut builder = Self::builder().name(name).level(level).console(settings.console);
        if let Some(filter) = &settings.filter {
            builder = builder.filter(filter.clone());
        }

        match &settings.directory {
            Some(directory) => builder.log_to(directory).json(settings.json).init(),
            None => builder.init(),
        }
    }

    /// Whether a log file worker is running.
    #[must_use]
    pub const fn writes_file(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Flushing log file");
        }
    }
}

impl Options {
    fn validate(&self, name: &str, sink: Option<&FileSink>) -> Result<(), LoggerError> {
        let problem = if name.trim().is_empty() {
            Some("logger name is blank")
        } else if sink.is_some_and(|sink| sink.retain == 0) {
            Some("at least one log file must be retained")
        } else if !self.console && sink.is_none() {
            Some("neither console nor file output is enabled")
        } else {
            None
        };

        problem.map_or(Ok(()), |message| {
            Err(LoggerError::InvalidConfiguration { message: message.into(), context: None })
        })
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.filter {
            None => Ok(builder.from_env_lossy()),
            Some(directives) => builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid filter '{directives}': {e}").into(),
                context: None,
            }),
        }
    }
}

fn console_layer() -> BoxedLayer {
    layer().compact().with_writer(io::stderr).with_ansi(io::stderr().is_terminal()).boxed()
}

fn file_layer(name: &str, sink: FileSink) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    fs::create_dir_all(&sink.directory).context(format!("Creating {}", sink.directory.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(sink.rotation)
        .filename_prefix(name)
        .filename_suffix(LOG_EXTENSION)
        .max_log_files(sink.retain)
        .build(&sink.directory)
        .context(format!("Rolling files in {}", sink.directory.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let plain = layer().with_writer(writer).with_ansi(false);
    let boxed = if sink.json { plain.json().boxed() } else { plain.boxed() };
    Ok((boxed, guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn defaults_log_info_to_the_console() {
        let builder = Logger::builder().name("storefront-test").filter("storefront_catalog=debug");
        assert!(builder.options.console);
        assert_eq!(builder.options.level, LevelFilter::INFO);
        assert_eq!(builder.options.filter.as_deref(), Some("storefront_catalog=debug"));
    }

    #[test]
    fn file_options_live_on_the_sink() {
        let tmp_dir = tempdir().unwrap();
        let log_dir = tmp_dir.path().join("logs");
        let builder = Logger::builder()
            .name("storefront-test")
            .console(false)
            .level(LevelFilter::DEBUG)
            .log_to(&log_dir)
            .retain(5)
            .json(true);

        let sink = &builder.file.0;
        assert!(!builder.options.console);
        assert!(sink.json);
        assert_eq!(sink.retain, 5);
        assert_eq!(sink.directory, log_dir);
    }

    #[test]
    #[serial]
    fn invalid_configuration_is_rejected_before_install() {
        let err = Logger::builder().name("  ").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder().name("storefront-test").console(false).init().unwrap_err();
        assert!(err.to_string().contains("neither console nor file"));

        let tmp_dir = tempdir().unwrap();
        let err = Logger::builder().name("storefront-test").log_to(tmp_dir.path()).retain(0).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder().name("storefront-test").filter("storefront_catalog=loudest").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let settings = LoggingSettings { level: "loud".into(), ..LoggingSettings::default() };
        let err = Logger::from_settings("storefront-test", &settings).unwrap_err();
        assert!(err.to_string().contains("Unknown log level 'loud'"));
    }
}
