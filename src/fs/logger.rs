//! File-based logger implementation for the V5 Brain.
//!
//! Implements the [`log`] crate's facade, writing each record to the
//! console (terminal/debug output) and to `intake.txt` in the root of the
//! SD card. Every entry carries the time since program start, so sort and
//! stall decisions can be lined up against match video afterwards.
//!
//! ```text
//! [2m 5s 123ms] INFO charybdis::intake::engine - Store Task Started (generation 3)
//! [2m 5s 456ms] WARN charybdis::intake::port - Optical Hue Error: Disconnected
//! ```
//!
//! Initialize once at the start of the program:
//!
//! ```ignore
//! use charybdis::fs::logger;
//! use log::LevelFilter;
//!
//! logger::init(LevelFilter::Info).expect("Logger init failed");
//! ```

use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    sync::Mutex,
    time::Duration,
};

use humantime::{FormattedDuration, format_duration};
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use vexide::time::user_uptime;

/// Name of the log file created in the root of the SD card.
const LOG_FILE: &str = "intake.txt";

/// A dual-output logger: console plus SD card file.
///
/// The file is created/truncated at initialization. When no SD card is
/// present the file writer is absent and only console output happens.
pub struct SortLogger {
    file_writer: Mutex<Option<BufWriter<std::fs::File>>>,
}

impl SortLogger {
    fn new() -> Self {
        let file_writer = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(LOG_FILE)
            .ok()
            .map(BufWriter::new);

        Self {
            file_writer: Mutex::new(file_writer),
        }
    }
}

impl log::Log for SortLogger {
    fn enabled(&self, metadata: &Metadata) -> bool { metadata.level() <= log::max_level() }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let log_line = format!(
                "[{}] {} {} - {}\n",
                get_time(),
                record.level(),
                record.target(),
                record.args()
            );

            print!("{}", log_line);

            if let Ok(mut writer_guard) = self.file_writer.lock() {
                if let Some(ref mut writer) = *writer_guard {
                    let _ = writer.write_all(log_line.as_bytes());
                }
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut writer_guard) = self.file_writer.lock() {
            if let Some(ref mut writer) = *writer_guard {
                let _ = writer.flush();
            }
        }
    }
}

static LOGGER: std::sync::OnceLock<SortLogger> = std::sync::OnceLock::new();

/// Initializes the logger.
///
/// Call once before any logging macros; subsequent records at or above
/// `level` go to the console and `intake.txt`.
///
/// # Errors
///
/// Returns [`SetLoggerError`] if a logger has already been set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(SortLogger::new);
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

/// Returns the formatted duration since the user program started.
///
/// On VexOS this is the actual uptime; on other platforms (for testing) a
/// placeholder value.
fn get_time() -> FormattedDuration {
    let dur = if cfg!(target_os = "vexos") {
        user_uptime()
    } else {
        Duration::from_millis(123432)
    };
    format_duration(dur)
}
