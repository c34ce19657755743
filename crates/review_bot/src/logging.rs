//! Logging initialization for review_bot.
//!
//! Appends to `./program.log` in the current working directory and mirrors
//! to the terminal.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub const LOG_FILE: &str = "program.log";

/// Destination for log output.
#[allow(dead_code)]
pub enum LogDestination {
    /// Append to the log file only.
    File,
    /// Write to terminal (stdout).
    Terminal,
    /// Write to both file and terminal.
    Both,
}

/// Initialize the global logger.
///
/// When the log file cannot be opened the terminal logger is still installed.
pub fn initialize(destination: LogDestination, log_path: &Path) {
    let loggers = build_loggers(destination, log_path, LevelFilter::Debug);
    let _ = CombinedLogger::init(loggers);
}

pub fn default_log_path() -> PathBuf {
    PathBuf::from(".").join(LOG_FILE)
}

pub(crate) fn build_loggers(
    destination: LogDestination,
    log_path: &Path,
    level: LevelFilter,
) -> Vec<Box<dyn SharedLogger>> {
    let config = build_config();
    let terminal = || -> Box<dyn SharedLogger> {
        TermLogger::new(
            LevelFilter::Info,
            build_config(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )
    };

    match destination {
        LogDestination::Terminal => vec![terminal()],
        LogDestination::File => match create_file_logger(level, config, log_path) {
            Some(file_logger) => vec![file_logger],
            None => vec![terminal()],
        },
        LogDestination::Both => {
            let mut loggers = vec![terminal()];
            if let Some(file_logger) = create_file_logger(level, config, log_path) {
                loggers.push(file_logger);
            }
            loggers
        }
    }
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    log_path: &Path,
) -> Option<Box<dyn SharedLogger>> {
    match open_append(log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not open log file at {:?}: {}", log_path, err);
            None
        }
    }
}

fn open_append(log_path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(log_path)
}
