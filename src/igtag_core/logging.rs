use crate::igtag_core::error::Result;
use log::{Log, Metadata, Record};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use time::format_description::FormatItem;
use time::macros::format_description;

/// Log file written in the current working directory for every run.
pub const LOG_FILE_NAME: &str = "igtag.log";

const LOG_TIME_FORMAT: &[FormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Logging handle for a single run.
///
/// Built once in `main` and passed by reference to the archive reader and the
/// exporter, which log through it with `log::info!(logger: run_log, ...)`.
/// It is never installed as the global logger; constructing one only raises
/// `log::max_level()` so the macros don't filter its records out.
pub struct RunLog {
    logger: Box<CombinedLogger>,
}

impl RunLog {
    /// Append INFO and above to the log file at `path`, and echo warnings and
    /// errors to the terminal.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let (config, local_offset) = log_config();

        let loggers: Vec<Box<dyn SharedLogger>> = vec![
            TermLogger::new(
                LevelFilter::Warn,
                config.clone(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            ),
            WriteLogger::new(LevelFilter::Info, config, file),
        ];

        Ok(Self::from_loggers(loggers, local_offset))
    }

    /// Log INFO and above to an arbitrary writer only.
    pub fn to_writer<W: Write + Send + 'static>(writer: W) -> Self {
        let (config, local_offset) = log_config();
        let loggers: Vec<Box<dyn SharedLogger>> =
            vec![WriteLogger::new(LevelFilter::Info, config, writer)];
        Self::from_loggers(loggers, local_offset)
    }

    /// A handle that drops every record.
    pub fn discard() -> Self {
        Self::from_loggers(Vec::new(), true)
    }

    fn from_loggers(loggers: Vec<Box<dyn SharedLogger>>, local_offset: bool) -> Self {
        let run_log = RunLog {
            logger: CombinedLogger::new(loggers),
        };

        // Only ever raised, so handles built side by side never mute each other.
        let level = run_log.logger.level();
        if level > log::max_level() {
            log::set_max_level(level);
        }

        if !local_offset {
            log::info!(logger: run_log, "Local UTC offset unavailable, log times are in UTC");
        }

        run_log
    }
}

impl Log for RunLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.logger.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        self.logger.log(record);
    }

    fn flush(&self) {
        self.logger.flush();
    }
}

impl Drop for RunLog {
    fn drop(&mut self) {
        self.logger.flush();
    }
}

/// Shared logger config, and whether the local UTC offset could be applied.
fn log_config() -> (Config, bool) {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_custom(LOG_TIME_FORMAT)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off);
    let local_offset = builder.set_time_offset_to_local().is_ok();
    (builder.build(), local_offset)
}
