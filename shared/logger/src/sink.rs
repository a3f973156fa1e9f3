//! Log destinations: file writer thread, stdout, in-memory capture.

use crate::error::Result;
use crate::log_level::LogLevel;
use crate::log_message::LogMessage;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};

/// Where a [`crate::Logger`] delivers its records.
#[derive(Clone)]
pub(crate) enum Sink {
    /// Lines are queued to a dedicated writer thread that owns the file.
    File(Sender<String>),
    /// Lines are printed to stdout on the calling thread.
    Console,
    /// Records are kept in memory.
    Capture(LogCapture),
}

impl Sink {
    /// Opens (or creates) `log_path` in append mode and spawns its writer.
    pub fn file(log_path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;
        let (sender, receiver) = channel();
        std::thread::spawn(move || run_writer(file, receiver));
        Ok(Sink::File(sender))
    }

    pub fn deliver(&self, message: &LogMessage) {
        match self {
            Sink::File(sender) => {
                let _ = sender.send(message.format_line());
            }
            Sink::Console => println!("{}", message.format_line()),
            Sink::Capture(capture) => capture.push(message.level, message.format_line()),
        }
    }
}

/// Writer loop; ends when every sender has been dropped.
fn run_writer(mut file: File, receiver: Receiver<String>) {
    for line in receiver {
        if let Err(e) = writeln!(file, "{}", line) {
            eprintln!("Error writing log: {}", e);
            continue;
        }
        if let Err(e) = file.flush() {
            eprintln!("Error flushing log: {}", e);
        }
    }
}

/// Shared in-memory buffer of captured log lines.
///
/// Cloning yields another view of the same buffer.
#[derive(Clone, Default)]
pub struct LogCapture {
    records: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl LogCapture {
    fn push(&self, level: LogLevel, line: String) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((level, line));
    }

    /// Returns every captured line in arrival order.
    pub fn lines(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Returns true if any captured line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    /// Counts captured records logged at exactly `level`.
    pub fn count_at(&self, level: LogLevel) -> usize {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|(l, _)| *l == level)
            .count()
    }
}
