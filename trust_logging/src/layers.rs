// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use crate::{
    appender,
    error::{Error, Result},
    LogBuilder, LogFormat, LogOutputDest,
};
use std::collections::BTreeMap;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_core::{Event, Level, Subscriber};
use tracing_subscriber::{
    filter::Targets,
    fmt::{
        self as tracing_fmt,
        format::Writer,
        time::{FormatTime, SystemTime},
        FmtContext, FormatEvent, FormatFields,
    },
    layer::Filter,
    registry::LookupSpan,
    reload::{self, Handle},
    Layer, Registry,
};

/// Variable holding the logging targets, e.g. `TRUST_LOG=trustlib=debug,alloy=info`.
pub const TRUST_LOG: &str = "TRUST_LOG";

const MAX_LOG_SIZE: usize = 20 * 1024 * 1024;
// Everything from our crates at trace, dependencies at info
const ALL_TRUST_LOGS: &str = "all";
// Trace at the cli, debug in the library and dependencies
const VERBOSE_TRUST_LOGS: &str = "v";

/// Handle that implements functions to change the log level on the fly.
pub struct ReloadHandle(pub(crate) Handle<Box<dyn Filter<Registry> + Send + Sync>, Registry>);

impl ReloadHandle {
    /// Replace the active targets with the ones parsed from `logging_value`, using the same
    /// syntax as [`TRUST_LOG`].
    pub fn modify_log_level(&self, logging_value: &str) -> Result<()> {
        let targets: Vec<(String, Level)> = get_logging_targets(logging_value)?;
        self.0.modify(|old_filter| {
            let new_filter: Box<dyn Filter<Registry> + Send + Sync> =
                Box::new(Targets::new().with_targets(targets));
            *old_filter = new_filter;
        })?;

        Ok(())
    }
}

/// `[time LEVEL module/span] message fields` lines.
#[derive(Default)]
pub(crate) struct LogFormatter;

impl<S, N> FormatEvent<S, N> for LogFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let level = *event.metadata().level();
        let module = event.metadata().module_path().unwrap_or("<unknown module>");
        let time = SystemTime;

        write!(writer, "[")?;
        time.format_time(&mut writer)?;
        write!(writer, " {level} {module}")?;
        ctx.visit_spans(|span| write!(writer, "/{}", span.name()))?;
        write!(writer, "] ")?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

#[derive(Default)]
pub(crate) struct TracingLayers {
    pub(crate) layers: Vec<Box<dyn Layer<Registry> + Send + Sync>>,
    pub(crate) log_appender_guard: Option<WorkerGuard>,
}

impl TracingLayers {
    pub(crate) fn fmt_layer(&mut self, builder: &LogBuilder) -> Result<ReloadHandle> {
        let format = builder.format;
        let layer = match &builder.output_dest {
            LogOutputDest::Stdout => {
                if builder.announce {
                    println!("Logging to stdout");
                }
                match format {
                    LogFormat::Json => tracing_fmt::layer().json().flatten_event(true).boxed(),
                    LogFormat::Default => tracing_fmt::layer()
                        .with_ansi(false)
                        .with_target(false)
                        .event_format(LogFormatter)
                        .boxed(),
                }
            }
            LogOutputDest::Stderr => match format {
                LogFormat::Json => tracing_fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(std::io::stderr)
                    .boxed(),
                LogFormat::Default => tracing_fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .event_format(LogFormatter)
                    .with_writer(std::io::stderr)
                    .boxed(),
            },
            LogOutputDest::Dir(path) => {
                std::fs::create_dir_all(path)?;
                if builder.announce {
                    println!("Logging to directory: {path:?}");
                }

                let (max_uncompressed_log_files, max_log_files) = builder.file_limits.resolve();
                let (file_rotation, worker_guard) = appender::file_rotater(
                    path,
                    MAX_LOG_SIZE,
                    max_uncompressed_log_files,
                    max_log_files,
                );
                self.log_appender_guard = Some(worker_guard);

                match format {
                    LogFormat::Json => tracing_fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_writer(file_rotation)
                        .boxed(),
                    LogFormat::Default => tracing_fmt::layer()
                        .with_ansi(false)
                        .with_writer(file_rotation)
                        .event_format(LogFormatter)
                        .boxed(),
                }
            }
        };

        let targets = match std::env::var(TRUST_LOG) {
            Ok(trust_log_val) => {
                if builder.announce {
                    println!("Using {TRUST_LOG}={trust_log_val}");
                }
                get_logging_targets(&trust_log_val)?
            }
            Err(_) => builder.default_logging_targets.clone(),
        };

        let target_filters: Box<dyn Filter<Registry> + Send + Sync> =
            Box::new(Targets::new().with_targets(targets));
        let (filter, reload_handle) = reload::Layer::new(target_filters);

        self.layers.push(Box::new(layer.with_filter(filter)));

        Ok(ReloadHandle(reload_handle))
    }
}

/// Parse a CSV of `crate=level` pairs and keywords.
///
/// `all` and `v` expand to a preset for our crates and their chain dependencies. Targets named
/// explicitly win over the preset, so `all,alloy=warn` keeps alloy at warn.
pub(crate) fn get_logging_targets(logging_env_value: &str) -> Result<Vec<(String, Level)>> {
    let mut targets = BTreeMap::new();
    let mut contains_keyword_all = false;
    let mut contains_keyword_verbose = false;

    for crate_log_level in logging_env_value.split(',').map(str::trim) {
        if crate_log_level.is_empty() {
            continue;
        }
        if crate_log_level == ALL_TRUST_LOGS {
            contains_keyword_all = true;
            continue;
        } else if crate_log_level == VERBOSE_TRUST_LOGS {
            contains_keyword_verbose = true;
            continue;
        }

        let mut split = crate_log_level.split('=');
        let crate_name = split
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                Error::LoggingConfiguration(
                    "Could not obtain crate name in logging string".to_string(),
                )
            })?;
        let log_level = split.next().unwrap_or("trace");
        targets.insert(crate_name.to_string(), get_log_level_from_str(log_level)?);
    }

    let mut preset = BTreeMap::new();
    if contains_keyword_all || contains_keyword_verbose {
        let (library_level, dependency_level) = if contains_keyword_all {
            (Level::TRACE, Level::INFO)
        } else {
            (Level::DEBUG, Level::DEBUG)
        };
        // bins
        preset.insert("mybit_trust".to_string(), Level::TRACE);
        // libs
        preset.insert("trust_logging".to_string(), Level::TRACE);
        preset.insert("trustlib".to_string(), library_level);
        // chain and http dependencies
        preset.insert("alloy".to_string(), dependency_level);
        preset.insert("reqwest".to_string(), dependency_level);
    }
    preset.extend(targets);
    Ok(preset.into_iter().collect())
}

fn get_log_level_from_str(log_level: &str) -> Result<Level> {
    match log_level.to_lowercase().as_str() {
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::LoggingConfiguration(format!(
            "Log level {log_level} is not supported"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_of(targets: &[(String, Level)], target: &str) -> Option<Level> {
        targets
            .iter()
            .find(|(name, _)| name == target)
            .map(|(_, level)| *level)
    }

    #[test]
    fn parses_explicit_targets() -> Result<()> {
        let targets = get_logging_targets("trustlib=debug, alloy=WARN,reqwest")?;
        assert_eq!(targets.len(), 3);
        assert_eq!(level_of(&targets, "trustlib"), Some(Level::DEBUG));
        assert_eq!(level_of(&targets, "alloy"), Some(Level::WARN));
        assert_eq!(level_of(&targets, "reqwest"), Some(Level::TRACE));
        Ok(())
    }

    #[test]
    fn keywords_expand_to_presets() -> Result<()> {
        let all = get_logging_targets("all")?;
        assert_eq!(level_of(&all, "trustlib"), Some(Level::TRACE));
        assert_eq!(level_of(&all, "alloy"), Some(Level::INFO));

        let verbose = get_logging_targets("v")?;
        assert_eq!(level_of(&verbose, "trustlib"), Some(Level::DEBUG));
        assert_eq!(level_of(&verbose, "mybit_trust"), Some(Level::TRACE));
        Ok(())
    }

    #[test]
    fn explicit_targets_win_over_keywords() -> Result<()> {
        let targets = get_logging_targets("trustlib=error,all")?;
        assert_eq!(level_of(&targets, "trustlib"), Some(Level::ERROR));
        assert_eq!(level_of(&targets, "trust_logging"), Some(Level::TRACE));
        Ok(())
    }

    #[test]
    fn rejects_unknown_levels_and_empty_names() {
        assert!(matches!(
            get_logging_targets("trustlib=loud"),
            Err(Error::LoggingConfiguration(_))
        ));
        assert!(matches!(
            get_logging_targets("=info"),
            Err(Error::LoggingConfiguration(_))
        ));
    }
}
