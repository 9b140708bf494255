use super::error::{ProcessError, ProcessResult};
use super::types::{Process, Runtime};
use crate::system::{Pid, ProcReader};
use tracing::debug;

/// Works out what kind of process lives behind a pid
pub struct ProcessDetector<R: ProcReader> {
    proc_reader: R,
}

impl<R: ProcReader> ProcessDetector<R> {
    pub fn new(proc_reader: R) -> Self {
        Self { proc_reader }
    }

    pub fn detect(&self, pid: Pid) -> ProcessResult<Process> {
        if pid <= 0 {
            return Err(ProcessError::InvalidPid { pid });
        }

        let exe = self.proc_reader.exe_path(pid)?;
        let runtime = Runtime::from_exe(&exe);
        debug!(pid, exe = %exe.display(), %runtime, "detected process");

        Ok(Process::new(pid, exe, runtime))
    }
}
