//! Audit sink implementations

use crate::{Result, VeritransError};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Severity of an audit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Info,
    Warn,
}

impl AuditLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditLevel::Info => "INFO",
            AuditLevel::Warn => "WARN",
        }
    }
}

impl fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for audit entries
///
/// Writes are best effort: callers log and ignore errors.
pub trait AuditSink: Send + Sync {
    /// Write one entry
    fn write(&self, level: AuditLevel, message: &str) -> Result<()>;

    /// Write an informational entry
    fn info(&self, message: &str) -> Result<()> {
        self.write(AuditLevel::Info, message)
    }

    /// Write a warning entry
    fn warn(&self, message: &str) -> Result<()> {
        self.write(AuditLevel::Warn, message)
    }
}

/// Emits audit entries as `tracing` events on the `veritrans::audit` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn write(&self, level: AuditLevel, message: &str) -> Result<()> {
        match level {
            AuditLevel::Info => tracing::info!(target: "veritrans::audit", "{}", message),
            AuditLevel::Warn => tracing::warn!(target: "veritrans::audit", "{}", message),
        }
        Ok(())
    }
}

/// Appends timestamped entries to a log file through `tracing_appender`
pub struct FileAuditSink {
    path: PathBuf,
    writer: Mutex<RollingFileAppender>,
}

impl fmt::Debug for FileAuditSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileAuditSink")
            .field("path", &self.path)
            .finish()
    }
}

impl FileAuditSink {
    /// Append to `path`, creating it (and its directory) if needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                VeritransError::audit(format!("{}: not a file path", path.display()))
            })?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::build(Rotation::NEVER, &directory, file_name)
    }

    /// Append to `<directory>/<prefix>.<YYYY-MM-DD>`, switching files daily
    pub fn daily(directory: impl AsRef<Path>, prefix: &str) -> Result<Self> {
        Self::build(Rotation::DAILY, directory.as_ref(), prefix)
    }

    fn build(rotation: Rotation, directory: &Path, prefix: &str) -> Result<Self> {
        let writer = RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(prefix)
            .build(directory)
            .map_err(|e| VeritransError::audit(format!("{}: {}", directory.display(), e)))?;
        Ok(Self {
            path: directory.join(prefix),
            writer: Mutex::new(writer),
        })
    }

    /// Log file path, or the path prefix when rotating
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for FileAuditSink {
    fn write(&self, level: AuditLevel, message: &str) -> Result<()> {
        let line = format!(
            "{} {} {}\n",
            chrono::Utc::now().to_rfc3339(),
            level,
            message
        );
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| VeritransError::audit("audit log mutex poisoned"))?;
        writer
            .write_all(line.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| VeritransError::audit(format!("{}: {}", self.path.display(), e)))
    }
}
