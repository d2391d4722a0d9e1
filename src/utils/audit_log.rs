//! Append-only, level-filtered decision trail.
//!
//! One `AuditLog` lives for one batch: opened before the first candidate,
//! appended synchronously per record, closed after the summary line. Write
//! failures are returned to the caller; the log is part of the correctness
//! contract, not best-effort.

use crate::error::AuditWriteError;
use crate::tezos::AccountId;
use crate::utils::config::{Config, LogLevel};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub level: LogLevel,
    pub message: String,
}

struct Sink {
    path: PathBuf,
    file: File,
}

pub struct AuditLog {
    sink: Option<Sink>,
    threshold: LogLevel,
    accepted: Vec<AuditRecord>,
}

impl AuditLog {
    /// Opens `config.log_file` in append mode, or a sink-less log when unset.
    pub fn open(config: &Config) -> Result<Self, AuditWriteError> {
        let sink = match config.log_file.as_deref() {
            Some(path) => Some(Sink {
                path: path.to_path_buf(),
                file: open_append(path)?,
            }),
            None => None,
        };
        Ok(Self {
            sink,
            threshold: config.log_level,
            accepted: Vec::new(),
        })
    }

    pub fn shall_log(&self, level: LogLevel) -> bool {
        level >= self.threshold
    }

    pub fn record(
        &mut self,
        level: LogLevel,
        message: impl Into<String>,
    ) -> Result<(), AuditWriteError> {
        if !self.shall_log(level) {
            return Ok(());
        }
        let message = message.into();
        if let Some(sink) = self.sink.as_mut() {
            let mut line = String::with_capacity(message.len() + 1);
            line.push_str(&message);
            line.push('\n');
            sink.file
                .write_all(line.as_bytes())
                .map_err(|source| AuditWriteError {
                    path: sink.path.display().to_string(),
                    source,
                })?;
        }
        self.accepted.push(AuditRecord { level, message });
        Ok(())
    }

    /// Records `{payer}: {message}`.
    pub fn candidate(
        &mut self,
        payer: &AccountId,
        level: LogLevel,
        message: &str,
    ) -> Result<(), AuditWriteError> {
        self.record(level, format!("{payer}: {message}"))
    }

    /// Flushes and closes the file, returning every record that passed the threshold.
    pub fn close(mut self) -> Result<Vec<AuditRecord>, AuditWriteError> {
        if let Some(mut sink) = self.sink.take() {
            sink.file.flush().map_err(|source| AuditWriteError {
                path: sink.path.display().to_string(),
                source,
            })?;
        }
        Ok(self.accepted)
    }
}

fn open_append(path: &Path) -> Result<File, AuditWriteError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| AuditWriteError {
            path: path.display().to_string(),
            source,
        })
}
