//! Manual barcode entry from stdin.
//!
//! A reader thread forwards each line over a channel so the scan loop can
//! poll for typed values between frames without blocking.

use logging::Logger;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// What the reader thread produced since the last poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualInput {
    /// A line was typed
    Line(String),
    /// Nothing new
    Empty,
    /// Input closed (EOF or read error)
    Closed,
}

pub struct ManualEntry {
    rx: Receiver<String>,
}

impl ManualEntry {
    /// Spawns a thread reading stdin line by line
    pub fn spawn_stdin(logger: Logger) -> Self {
        Self::spawn(io::BufReader::new(io::stdin()), logger)
    }

    /// Spawns a thread reading `reader` line by line
    pub fn spawn<R: BufRead + Send + 'static>(reader: R, logger: Logger) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        logger.warn(&format!("Manual input read failed: {}", e));
                        break;
                    }
                }
            }
            logger.debug("Manual input closed");
        });

        Self { rx }
    }

    /// Returns the next typed line without blocking
    pub fn poll(&self) -> ManualInput {
        match self.rx.try_recv() {
            Ok(line) => ManualInput::Line(line),
            Err(TryRecvError::Empty) => ManualInput::Empty,
            Err(TryRecvError::Disconnected) => ManualInput::Closed,
        }
    }

    /// Blocks until a line arrives or input closes
    pub fn wait(&self) -> ManualInput {
        match self.rx.recv() {
            Ok(line) => ManualInput::Line(line),
            Err(_) => ManualInput::Closed,
        }
    }
}
