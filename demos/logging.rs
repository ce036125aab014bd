// Logging set-up that is shared by the demos.
//
// Set the environment variable `RPAN_LOG_LEVEL` to one of 'off', 'error', 'warn', 'info',
// 'debug' or 'trace' to enable logging; the default is 'warn'.
// Set `RPAN_LOG_FILE` to the name of a file to log to that file instead of to the terminal.
// For the VST plugin, these environment variables need to be visible to the host.
use log::LevelFilter;
use simplelog::{ColorChoice, Config, SimpleLogger, TermLogger, TerminalMode, WriteLogger};
use std::env;
use std::fs::File;
use std::str::FromStr;

pub const LOG_LEVEL_VARIABLE: &str = "RPAN_LOG_LEVEL";
pub const LOG_FILE_VARIABLE: &str = "RPAN_LOG_FILE";

fn log_level() -> LevelFilter {
    match env::var(LOG_LEVEL_VARIABLE) {
        Ok(level) => LevelFilter::from_str(&level).unwrap_or_else(|_| {
            eprintln!(
                "Unrecognized log level {:?} in {}, using 'warn'.",
                level, LOG_LEVEL_VARIABLE
            );
            LevelFilter::Warn
        }),
        Err(_) => LevelFilter::Warn,
    }
}

/// Initialize logging for an application that has a terminal.
#[allow(dead_code)]
pub fn initialize_logging() {
    let level = log_level();
    let result = match env::var(LOG_FILE_VARIABLE) {
        Ok(file_name) => match File::create(&file_name) {
            Ok(file) => WriteLogger::init(level, Config::default(), file),
            Err(e) => {
                eprintln!("Cannot create log file {}: {}", file_name, e);
                return;
            }
        },
        Err(_) => TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
    };
    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

/// Initialize logging for a plugin that is loaded by a host.
///
/// Only logs when `RPAN_LOG_FILE` is set, because the host may not have a terminal.
/// Calling this more than once has no effect.
#[allow(dead_code)]
pub fn initialize_plugin_logging() {
    let file_name = match env::var(LOG_FILE_VARIABLE) {
        Ok(file_name) => file_name,
        Err(_) => return,
    };
    let level = log_level();
    match File::create(&file_name) {
        Ok(file) => {
            let _ = WriteLogger::init(level, Config::default(), file);
        }
        Err(_) => {
            let _ = SimpleLogger::init(level, Config::default());
        }
    }
}
