//! Command history: the in-memory ring, capture files and replay bookkeeping.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::HistoryError;

pub const DEFAULT_HISTORY_CAPACITY: usize = 200;
/// Deepest nesting of `rdhis` inside replayed files.
pub const MAX_REPLAY_DEPTH: usize = 16;

type Result<T> = std::result::Result<T, HistoryError>;

struct Capture {
    path: PathBuf,
    writer: BufWriter<File>,
}

/// Valid commands of the session, newest last.
pub struct History {
    ring: VecDeque<String>,
    capacity: usize,
    capture: Option<Capture>,
}

impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("len", &self.ring.len())
            .field("capacity", &self.capacity)
            .field("capture", &self.capture_path())
            .finish()
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ring: VecDeque::with_capacity(capacity),
            capacity,
            capture: None,
        }
    }

    /// Append a command, dropping the oldest once the ring is full, and copy
    /// it to the capture file when one is open.
    pub fn record(&mut self, command: &str) -> Result<()> {
        if self.ring.len() == self.capacity {
            self.ring.pop_front();
        }
        self.ring.push_back(command.to_string());

        if let Some(capture) = &mut self.capture {
            writeln!(capture.writer, "{command}")
                .and_then(|()| capture.writer.flush())
                .map_err(|source| HistoryError::Write {
                    path: capture.path.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.ring.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Start copying recorded commands to `path`, closing any earlier capture.
    pub fn start_capture(&mut self, path: &Path) -> Result<()> {
        self.stop_capture()?;
        let file = File::create(path).map_err(|source| HistoryError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "history capture started");
        self.capture = Some(Capture {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        });
        Ok(())
    }

    /// Close the capture file, returning its path.
    pub fn stop_capture(&mut self) -> Result<Option<PathBuf>> {
        let Some(mut capture) = self.capture.take() else {
            return Ok(None);
        };
        capture.writer.flush().map_err(|source| HistoryError::Write {
            path: capture.path.clone(),
            source,
        })?;
        tracing::info!(path = %capture.path.display(), "history capture ended");
        Ok(Some(capture.path))
    }

    pub fn capture_path(&self) -> Option<&Path> {
        self.capture.as_ref().map(|c| c.path.as_path())
    }

    /// Write the ring to a file, oldest first. Returns the number of lines.
    pub fn write_ring(&self, path: &Path) -> Result<usize> {
        let write_error = |source| HistoryError::Write {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(|source| HistoryError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        for command in &self.ring {
            writeln!(writer, "{command}").map_err(write_error)?;
        }
        writer.flush().map_err(write_error)?;
        Ok(self.ring.len())
    }
}

/// A command file loaded for replay.
#[derive(Debug, Clone)]
pub struct CommandFile {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl CommandFile {
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| HistoryError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            lines: text.lines().map(str::to_string).collect(),
        })
    }

    /// Lines to run from 1-based `start`, with their line numbers. Blank lines
    /// and lines starting with `#` are skipped.
    pub fn commands_from(&self, start: usize) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| (i + 1, line.as_str()))
            .filter(move |(number, line)| {
                let trimmed = line.trim_start();
                *number >= start && !trimmed.is_empty() && !trimmed.starts_with('#')
            })
    }
}

/// Where a paused replay picks up again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumePoint {
    pub path: PathBuf,
    /// 1-based line to run next.
    pub next_line: usize,
}

/// How a replay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStatus {
    Completed,
    Paused,
    /// A `quit` ended the session.
    Stopped,
}

/// Replay nesting and pause state of a session.
#[derive(Debug, Clone, Default)]
pub struct ReplayState {
    pub(crate) depth: usize,
    pub(crate) pausing: bool,
    pub(crate) resume: Option<ResumePoint>,
}

impl ReplayState {
    pub fn is_replaying(&self) -> bool {
        self.depth > 0
    }

    pub fn resume_point(&self) -> Option<&ResumePoint> {
        self.resume.as_ref()
    }
}
