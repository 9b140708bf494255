use crate::system::{CommandSpec, Pid};
use std::path::{Path, PathBuf};

/// Runtime family of a process, as far as profiling is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    /// Native code, nothing to do before profiling
    NonSpecial,
    /// JVM; JIT frames need a perf map from the attach agent
    Java,
}

impl Runtime {
    /// Classify an executable by its resolved path
    pub fn from_exe(exe: &Path) -> Self {
        if exe.to_string_lossy().contains("java") {
            Runtime::Java
        } else {
            Runtime::NonSpecial
        }
    }
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Runtime::NonSpecial => write!(f, "non-special"),
            Runtime::Java => write!(f, "java"),
        }
    }
}

/// A detected OS process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pid: Pid,
    exe: PathBuf,
    runtime: Runtime,
}

impl Process {
    pub fn new(pid: Pid, exe: PathBuf, runtime: Runtime) -> Self {
        Self { pid, exe, runtime }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }

    pub fn runtime(&self) -> Runtime {
        self.runtime
    }

    pub fn needs_preparation(&self) -> bool {
        self.runtime == Runtime::Java
    }
}

/// What `Preparer::prepare` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preparation {
    NotNeeded,
    Attached { command: CommandSpec, output: String },
}
