// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

//! Tracing subscriber setup shared by the MyBit Trust binaries.
//!
//! A [`LogBuilder`] installs one formatting layer writing to stdout, stderr or a rotating file
//! set, filtered by the targets given at startup or by [`TRUST_LOG`].

mod appender;
mod error;
mod layers;

use crate::error::Result;
use layers::TracingLayers;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt};

pub use error::Error;
pub use layers::{ReloadHandle, TRUST_LOG};
pub use tracing_appender::non_blocking::WorkerGuard;
pub use tracing_core::Level;

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutputDest {
    Stderr,
    Stdout,
    /// Directory holding the rotated log files.
    Dir(PathBuf),
}

impl LogOutputDest {
    /// A fresh timestamped directory under the user data dir.
    pub fn data_dir() -> Result<Self> {
        let data_dir = dirs_next::data_dir().ok_or_else(|| {
            Error::LoggingConfiguration("could not obtain data directory path".to_string())
        })?;
        let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
        Ok(LogOutputDest::Dir(
            data_dir
                .join("mybit-trust")
                .join("logs")
                .join(format!("log_{timestamp}")),
        ))
    }
}

impl FromStr for LogOutputDest {
    type Err = Error;

    /// `stdout`, `stderr`, `data-dir`, or any other value as a directory that is created on
    /// first use.
    fn from_str(value: &str) -> Result<Self> {
        match value {
            "stdout" => Ok(LogOutputDest::Stdout),
            "stderr" => Ok(LogOutputDest::Stderr),
            "data-dir" => LogOutputDest::data_dir(),
            dir => Ok(LogOutputDest::Dir(PathBuf::from(dir))),
        }
    }
}

impl fmt::Display for LogOutputDest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogOutputDest::Stderr => f.write_str("stderr"),
            LogOutputDest::Stdout => f.write_str("stdout"),
            LogOutputDest::Dir(dir) => write!(f, "{}", dir.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Default,
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "default" => Ok(LogFormat::Default),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::LoggingConfiguration(format!(
                "Unknown log format {other:?}, expected \"default\" or \"json\""
            ))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Default => f.write_str("default"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

const MAX_UNCOMPRESSED_LOG_FILES: usize = 10;
const MAX_LOG_FILES: usize = 1000;

/// How many rotated files a log directory keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileLimits {
    /// Plain text files kept before older ones are compressed.
    pub uncompressed: Option<usize>,
    /// Compressed files kept before the oldest is deleted.
    pub archived: Option<usize>,
}

impl FileLimits {
    /// `(uncompressed, total)` file counts for the rotater. The total has to exceed the
    /// uncompressed count for anything to be archived.
    pub(crate) fn resolve(&self) -> (usize, usize) {
        let uncompressed = self.uncompressed.unwrap_or(MAX_UNCOMPRESSED_LOG_FILES);
        let total = match self.archived {
            Some(archived) => uncompressed + archived,
            None => uncompressed.max(MAX_LOG_FILES),
        };
        (uncompressed, total)
    }
}

pub struct LogBuilder {
    default_logging_targets: Vec<(String, Level)>,
    output_dest: LogOutputDest,
    format: LogFormat,
    file_limits: FileLimits,
    announce: bool,
}

impl LogBuilder {
    /// `default_logging_targets` apply unless [`TRUST_LOG`] is set. Logs go to stderr in the
    /// default format until configured otherwise.
    pub fn new(default_logging_targets: Vec<(String, Level)>) -> Self {
        Self {
            default_logging_targets,
            output_dest: LogOutputDest::Stderr,
            format: LogFormat::Default,
            file_limits: FileLimits::default(),
            announce: true,
        }
    }

    pub fn output_dest(mut self, output_dest: LogOutputDest) -> Self {
        self.output_dest = output_dest;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Ignored unless logging to a directory.
    pub fn file_limits(mut self, file_limits: FileLimits) -> Self {
        self.file_limits = file_limits;
        self
    }

    /// Don't print where the logs go, or the [`TRUST_LOG`] value in use, to stdout.
    pub fn quiet(mut self) -> Self {
        self.announce = false;
        self
    }

    /// Install the global subscriber. The returned guard flushes the file appender on drop, so
    /// it must live as long as the program.
    pub fn initialize(self) -> Result<(ReloadHandle, Option<WorkerGuard>)> {
        let mut layers = TracingLayers::default();
        let reload_handle = layers.fmt_layer(&self)?;

        if tracing_subscriber::registry()
            .with(layers.layers)
            .try_init()
            .is_err()
        {
            eprintln!("Tried to initialize and set global default subscriber more than once");
        }

        Ok((reload_handle, layers.log_appender_guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LogFormatter;
    use color_eyre::Result;
    use tracing::{trace, warn};
    use tracing_subscriber::{
        filter::Targets,
        fmt as tracing_fmt,
        layer::{Filter, SubscriberExt},
        reload,
        util::SubscriberInitExt,
        Layer, Registry,
    };
    use tracing_test::internal::{global_buf, MockWriter};

    fn captured_lines() -> Vec<String> {
        let buf = global_buf().lock().expect("buffer lock poisoned");
        String::from_utf8_lossy(&buf)
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn parses_output_destinations_and_formats() -> Result<()> {
        assert_eq!("stdout".parse::<LogOutputDest>()?, LogOutputDest::Stdout);
        assert_eq!("stderr".parse::<LogOutputDest>()?, LogOutputDest::Stderr);
        assert_eq!(
            "/tmp/trust-logs".parse::<LogOutputDest>()?,
            LogOutputDest::Dir(PathBuf::from("/tmp/trust-logs"))
        );
        assert!("yaml".parse::<LogFormat>().is_err());
        assert_eq!("json".parse::<LogFormat>()?.to_string(), "json");
        Ok(())
    }

    #[test]
    fn file_limits_keep_room_for_archives() {
        assert_eq!(
            FileLimits::default().resolve(),
            (MAX_UNCOMPRESSED_LOG_FILES, MAX_LOG_FILES)
        );
        let limits = FileLimits {
            uncompressed: Some(3),
            archived: Some(5),
        };
        assert_eq!(limits.resolve(), (3, 8));
        let many_plain = FileLimits {
            uncompressed: Some(2000),
            archived: None,
        };
        assert_eq!(many_plain.resolve(), (2000, 2000));
    }

    #[test]
    fn reload_handle_swaps_targets() -> Result<()> {
        let layer = tracing_fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .event_format(LogFormatter)
            .with_writer(MockWriter::new(global_buf()))
            .boxed();

        let filter: Box<dyn Filter<Registry> + Send + Sync> = Box::new(
            Targets::new().with_targets(vec![("trust_logging::tests".to_string(), Level::TRACE)]),
        );
        let (filter, handle) = reload::Layer::new(filter);
        tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .try_init()?;
        let reload_handle = ReloadHandle(handle);

        trace!("before the reload");
        let lines = captured_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("before the reload"));

        reload_handle.modify_log_level("trust_logging::tests=WARN")?;
        trace!("dropped after the reload");
        warn!("kept after the reload");

        let lines = captured_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("kept after the reload"));
        Ok(())
    }
}
