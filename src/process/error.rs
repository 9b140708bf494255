use std::time::Duration;
use thiserror::Error;

use crate::system::proc::Pid;

/// Errors that can occur while detecting or preparing a process
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Pid can never name a process
    #[error("invalid pid: {pid}")]
    InvalidPid { pid: Pid },

    /// No process with this pid, or its executable is gone
    #[error("process {pid} not found")]
    NotFound { pid: Pid },

    /// The process exists but /proc refuses to tell us about it
    #[error("permission denied reading {what} of process {pid}")]
    PermissionDenied { pid: Pid, what: String },

    /// Any other /proc failure
    #[error("failed to read {what} of process {pid}")]
    Proc {
        pid: Pid,
        what: String,
        #[source]
        source: procfs::ProcError,
    },

    /// Command could not be spawned or waited on
    #[error("failed to run `{command}`")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Command ran but exited unsuccessfully
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ProcessError {
    /// Map a procfs failure for `pid` onto our error variants
    pub fn from_proc(pid: Pid, what: &str, err: procfs::ProcError) -> Self {
        match err {
            procfs::ProcError::NotFound(_) => ProcessError::NotFound { pid },
            procfs::ProcError::PermissionDenied(_) => ProcessError::PermissionDenied {
                pid,
                what: what.to_string(),
            },
            other => ProcessError::Proc {
                pid,
                what: what.to_string(),
                source: other,
            },
        }
    }

    pub fn io(command: &str, source: std::io::Error) -> Self {
        ProcessError::Io {
            command: command.to_string(),
            source,
        }
    }

    pub fn command_failed(command: &str, status: &str, stderr: &str) -> Self {
        ProcessError::CommandFailed {
            command: command.to_string(),
            status: status.to_string(),
            stderr: stderr.trim().to_string(),
        }
    }

    pub fn timeout(command: &str, timeout: Duration) -> Self {
        ProcessError::Timeout {
            command: command.to_string(),
            timeout,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ProcessError::Config {
            message: message.into(),
        }
    }

    /// True when the pid does not name a live process.
    /// An invalid pid counts: there is nothing to find behind it.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ProcessError::InvalidPid { .. } | ProcessError::NotFound { .. }
        )
    }
}

/// Result type alias for process operations
pub type ProcessResult<T> = Result<T, ProcessError>;
