/// File persistence for log lines
///
/// One file per day under `logs/`, opened lazily and appended to.
use chrono::Local;
use once_cell::sync::Lazy;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::sync::Mutex;

use super::config::get_logger_config;
use crate::paths;

struct LogFile {
    date: String,
    writer: BufWriter<File>,
}

static LOG_FILE: Lazy<Mutex<Option<LogFile>>> = Lazy::new(|| Mutex::new(None));

fn open_for_date(date: &str) -> Option<LogFile> {
    let path = paths::get_logs_directory().join(format!("blockstreetbot_{}.log", date));
    let file = OpenOptions::new().create(true).append(true).open(path).ok()?;
    Some(LogFile {
        date: date.to_string(),
        writer: BufWriter::new(file),
    })
}

/// Open today's log file (no-op when file logging is disabled)
pub fn init_file_logging() {
    if !get_logger_config().file_logging {
        return;
    }
    let today = Local::now().format("%Y-%m-%d").to_string();
    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = open_for_date(&today);
    }
}

/// Append a plain (uncolored) line, rotating when the day changes
pub fn write_to_file(line: &str) {
    if !get_logger_config().file_logging {
        return;
    }

    let Ok(mut guard) = LOG_FILE.lock() else {
        return;
    };

    let today = Local::now().format("%Y-%m-%d").to_string();
    let needs_rotation = match guard.as_ref() {
        Some(file) => file.date != today,
        None => false,
    };
    if needs_rotation {
        if let Some(mut old) = guard.take() {
            let _ = old.writer.flush();
        }
        *guard = open_for_date(&today);
    }

    if let Some(file) = guard.as_mut() {
        let _ = writeln!(file.writer, "{}", line);
    }
}

/// Flush buffered lines to disk
pub fn flush_file_logging() {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(file) = guard.as_mut() {
            let _ = file.writer.flush();
        }
    }
}
