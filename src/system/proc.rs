use crate::process::error::{ProcessError, ProcessResult};
#[cfg(test)]
use std::collections::HashMap;
use std::path::PathBuf;

/// Process id as used by procfs and nix
pub type Pid = i32;

/// Owner of a process, or who a command should run as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials {
    pub uid: u32,
    pub gid: u32,
}

impl Credentials {
    /// Real uid/gid of the current process
    pub fn current() -> Self {
        Self {
            uid: nix::unistd::getuid().as_raw(),
            gid: nix::unistd::getgid().as_raw(),
        }
    }
}

/// Abstraction over /proc to enable testing without real processes
pub trait ProcReader {
    /// Resolve `/proc/<pid>/exe`
    fn exe_path(&self, pid: Pid) -> ProcessResult<PathBuf>;

    /// Effective uid/gid from `/proc/<pid>/status`
    fn credentials(&self, pid: Pid) -> ProcessResult<Credentials>;
}

/// Real /proc reader backed by procfs
#[derive(Debug, Clone, Copy, Default)]
pub struct RealProcReader;

impl RealProcReader {
    fn open(pid: Pid, what: &str) -> ProcessResult<procfs::process::Process> {
        procfs::process::Process::new(pid).map_err(|e| ProcessError::from_proc(pid, what, e))
    }
}

impl ProcReader for RealProcReader {
    fn exe_path(&self, pid: Pid) -> ProcessResult<PathBuf> {
        Self::open(pid, "exe")?
            .exe()
            .map_err(|e| ProcessError::from_proc(pid, "exe", e))
    }

    fn credentials(&self, pid: Pid) -> ProcessResult<Credentials> {
        let status = Self::open(pid, "status")?
            .status()
            .map_err(|e| ProcessError::from_proc(pid, "status", e))?;

        Ok(Credentials {
            uid: status.euid,
            gid: status.egid,
        })
    }
}

/// In-memory /proc with a fixed set of processes
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StaticProcReader {
    processes: HashMap<Pid, (PathBuf, Credentials)>,
}

#[cfg(test)]
impl StaticProcReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_process(
        mut self,
        pid: Pid,
        exe: impl Into<PathBuf>,
        credentials: Credentials,
    ) -> Self {
        self.processes.insert(pid, (exe.into(), credentials));
        self
    }
}

#[cfg(test)]
impl ProcReader for StaticProcReader {
    fn exe_path(&self, pid: Pid) -> ProcessResult<PathBuf> {
        self.processes
            .get(&pid)
            .map(|(exe, _)| exe.clone())
            .ok_or(ProcessError::NotFound { pid })
    }

    fn credentials(&self, pid: Pid) -> ProcessResult<Credentials> {
        self.processes
            .get(&pid)
            .map(|(_, credentials)| *credentials)
            .ok_or(ProcessError::NotFound { pid })
    }
}
