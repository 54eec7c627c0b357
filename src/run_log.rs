use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::HarvestError;

/// Receives the human-readable progress lines of a harvest run, in call order.
pub trait LineSink {
    fn emit(&mut self, line: &str);
}

/// Append-only run log mirrored to stdout and a log file.
pub struct RunLog {
    file: BufWriter<File>,
}

impl RunLog {
    pub fn open(path: &Path) -> Result<Self, HarvestError> {
        let file = File::create(path).map_err(|_| HarvestError::LogOpen(path.to_path_buf()))?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }

    pub fn close(mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl LineSink for RunLog {
    fn emit(&mut self, line: &str) {
        println!("{line}");
        let written = writeln!(self.file, "{line}").and_then(|()| self.file.flush());
        if let Err(err) = written {
            tracing::warn!(error = %err, "failed to append to run log");
        }
    }
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub lines: Vec<String>,
}

impl LineSink for MemorySink {
    fn emit(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}
